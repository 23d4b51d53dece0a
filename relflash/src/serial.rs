use std::io::{self, BufRead, Write};

use anyhow::{Result, anyhow, bail};

/// Convert macOS /dev/tty.* ports to /dev/cu.* ports
///
/// On macOS, /dev/tty.* ports should be avoided in favor of /dev/cu.* ports
/// This function automatically converts any /dev/tty.* path to its /dev/cu.* equivalent
fn normalize_mac_port_name(port_name: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        if port_name.starts_with("/dev/tty.") {
            return port_name.replace("/dev/tty.", "/dev/cu.");
        }
    }
    port_name.to_string()
}

pub fn normalize_port_name(port_name: &str) -> String {
    normalize_mac_port_name(port_name)
}

fn usable_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()
        .map_err(|e| anyhow!("Failed to get available ports list: {}", e))?;

    // On macOS, only use /dev/cu.* ports, not /dev/tty.* ports
    #[cfg(target_os = "macos")]
    let filtered: Vec<String> = ports
        .into_iter()
        .map(|p| p.port_name)
        .filter(|name| !name.starts_with("/dev/tty."))
        .collect();

    #[cfg(not(target_os = "macos"))]
    let filtered: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();

    Ok(filtered)
}

/// Check if the specified serial port is available
pub fn check_port_available(port_name: &str) -> Result<()> {
    let ports = usable_ports()?;
    if ports.iter().any(|p| p == port_name) {
        return Ok(());
    }

    bail!(
        "The specified port '{}' does not exist. Available ports: {}",
        port_name,
        if ports.is_empty() {
            "No available ports".to_string()
        } else {
            ports.join(", ")
        }
    )
}

/// Interactively pick a serial port from the available ones.
///
/// Empty input cancels the selection, which the caller treats as a
/// recoverable connect failure rather than a fatal error.
pub fn prompt_for_port() -> Result<String> {
    let ports = usable_ports()?;
    if ports.is_empty() {
        bail!("No serial ports available");
    }

    println!("Available serial ports:");
    for (index, port) in ports.iter().enumerate() {
        println!("  [{}] {}", index + 1, port);
    }
    print!("Select port [1-{}], empty to cancel: ", ports.len());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        bail!("port selection cancelled");
    }

    let choice: usize = line
        .parse()
        .map_err(|_| anyhow!("invalid selection '{}'", line))?;
    if choice == 0 || choice > ports.len() {
        bail!("selection {} out of range", choice);
    }
    Ok(ports[choice - 1].clone())
}
