pub mod catalog;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod materialize;
pub mod progress;
pub mod session;
pub mod terminal;
pub mod utils;

pub use catalog::{Catalog, Partition, Release};
pub use engine::{EngineFactory, FlashEngine, FlashSize, WriteFlashParams};
pub use error::{Error, Result};
pub use fetch::{BlobFetcher, HttpFetcher};
pub use materialize::materialize_release;
pub use progress::{NoOpProgress, ProgressCallback};
pub use session::{FlashSession, SessionState};
pub use terminal::{BufferTerminal, Terminal};

/// One downloaded partition image, ready to be written to flash.
///
/// `address` is the absolute byte offset in flash, already parsed from
/// the manifest's textual offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    pub data: Vec<u8>,
    pub address: u32,
}

impl FirmwareImage {
    pub fn new(data: Vec<u8>, address: u32) -> Self {
        Self { data, address }
    }
}
