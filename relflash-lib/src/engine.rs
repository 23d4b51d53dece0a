//! Flash engine boundary.
//!
//! The actual flashing protocol (bootloader handshake, chip detection,
//! erase/write sequencing, compression) lives outside this crate. The
//! session drives it through this narrow interface; implementations wrap
//! whatever engine the frontend has available.

use strum::Display;

use crate::FirmwareImage;
use crate::error::Result;
use crate::progress::ProgressCallback;
use crate::terminal::Terminal;

/// Flash size handling passed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FlashSize {
    #[strum(serialize = "keep")]
    Keep,
    #[strum(serialize = "detect")]
    Detect,
}

/// Parameters for a full write-flash operation.
#[derive(Debug, Clone)]
pub struct WriteFlashParams<'a> {
    pub files: &'a [FirmwareImage],
    pub flash_size: FlashSize,
    pub erase_all: bool,
    pub compress: bool,
}

pub trait FlashEngine: std::fmt::Debug {
    /// Run the engine's handshake/autodetect sequence and return the
    /// detected chip identifier. Diagnostics stream into `terminal`.
    fn initialize(&mut self, terminal: &mut dyn Terminal) -> Result<String>;

    /// Write every image in `params.files` to flash.
    fn write_flash(
        &mut self,
        params: &WriteFlashParams<'_>,
        progress: &mut dyn ProgressCallback,
        terminal: &mut dyn Terminal,
    ) -> Result<()>;
}

/// Produces a connected engine on demand.
///
/// The factory stands in for the user-mediated port selection prompt:
/// it is invoked the first time [`crate::FlashSession::connect`] needs a
/// device, and an `Err` models a cancelled selection (recoverable, the
/// session may prompt again on the next connect).
pub type EngineFactory = Box<dyn FnMut() -> Result<Box<dyn FlashEngine>>>;
