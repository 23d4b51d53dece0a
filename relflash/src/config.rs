use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Application default configuration values.
pub struct Defaults;

impl Defaults {
    pub const SERVER: &'static str = "http://localhost:8000";
    pub const BAUD: u32 = 460800;
    pub const ROM_BAUD: u32 = 460800;
    pub const ESPTOOL: &'static str = "esptool.py";
}

/// JSON configuration file. Every field is optional; flags win over the
/// file, the file wins over defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelflashConfig {
    pub server: Option<String>,
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub rom_baud: Option<u32>,
    pub esptool: Option<String>,
}

impl RelflashConfig {
    pub fn load(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open config file {path}"))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config file {path}"))?;
        Ok(config)
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: String,
    pub port: Option<String>,
    pub baud: u32,
    pub rom_baud: u32,
    pub esptool: String,
}

pub fn merge(args: &Cli) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => RelflashConfig::load(path)?,
        None => RelflashConfig::default(),
    };

    Ok(Settings {
        server: args
            .server
            .clone()
            .or(file.server)
            .unwrap_or_else(|| Defaults::SERVER.to_string()),
        port: args.port.clone().or(file.port),
        baud: args.baud.or(file.baud).unwrap_or(Defaults::BAUD),
        rom_baud: args.rom_baud.or(file.rom_baud).unwrap_or(Defaults::ROM_BAUD),
        esptool: args
            .esptool
            .clone()
            .or(file.esptool)
            .unwrap_or_else(|| Defaults::ESPTOOL.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_apply_without_config() {
        let args = Cli::parse_from(["relflash", "list"]);
        let settings = merge(&args).unwrap();

        assert_eq!(settings.server, Defaults::SERVER);
        assert_eq!(settings.baud, Defaults::BAUD);
        assert_eq!(settings.rom_baud, Defaults::ROM_BAUD);
        assert_eq!(settings.esptool, Defaults::ESPTOOL);
        assert!(settings.port.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Cli::parse_from([
            "relflash",
            "-s",
            "http://releases.example.com",
            "-p",
            "/dev/ttyUSB0",
            "-b",
            "921600",
            "list",
        ]);
        let settings = merge(&args).unwrap();

        assert_eq!(settings.server, "http://releases.example.com");
        assert_eq!(settings.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(settings.baud, 921600);
        // Untouched fields keep their defaults.
        assert_eq!(settings.rom_baud, Defaults::ROM_BAUD);
    }
}
