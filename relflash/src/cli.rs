use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "relflash CLI", long_about = None)]
pub struct Cli {
    /// JSON configuration file path
    #[arg(long = "config", short = 'f')]
    pub config: Option<String>,

    /// Base URL of the release server (default: http://localhost:8000)
    #[arg(short = 's', long = "server")]
    pub server: Option<String>,

    /// Serial port device; when omitted, an interactive picker is shown
    #[arg(short = 'p', long = "port")]
    pub port: Option<String>,

    /// Serial baud rate used when flashing (default: 460800)
    #[arg(short = 'b', long = "baud")]
    pub baud: Option<u32>,

    /// Baud rate used for the initial ROM handshake (default: 460800)
    #[arg(long = "rom-baud")]
    pub rom_baud: Option<u32>,

    /// Path to the esptool executable (default: esptool.py)
    #[arg(long = "esptool")]
    pub esptool: Option<String>,

    /// Suppress the flashing progress bar
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List firmware releases available on the release server
    #[command(name = "list")]
    List,

    /// Download a release's partitions to a local directory
    #[command(name = "download")]
    Download(Download),

    /// Download a release and write it to the connected device
    #[command(name = "flash")]
    Flash(Flash),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Download a release's partitions to a local directory")]
pub struct Download {
    /// Release name, or its index in the catalog
    #[arg(required = true)]
    pub release: String,

    /// Output directory
    #[arg(short = 'o', long = "out", default_value = ".")]
    pub out: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Download a release and write it to the connected device")]
pub struct Flash {
    /// Release name, or its index in the catalog
    #[arg(required = true)]
    pub release: String,
}
