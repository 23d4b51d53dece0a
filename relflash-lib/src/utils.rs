use std::num::ParseIntError;

/// Parse a flash offset from its textual manifest form.
///
/// Accepts decimal, `0x` hex, `0o` octal and `0b` binary.
pub fn parse_offset(s: &str) -> Result<u32, ParseIntError> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(oct) = s.strip_prefix("0o") {
        u32::from_str_radix(oct, 8)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    }
}
