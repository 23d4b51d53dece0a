use thiserror::Error;

/// Convenient result type for `relflash-lib`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("offset parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("catalog fetch failed: {0}")]
    CatalogFetch(String),

    #[error("partition `{name}` fetch failed: {reason}")]
    PartitionFetch { name: String, reason: String },

    #[error("release index {index} out of range ({len} releases)")]
    ReleaseIndex { index: usize, len: usize },

    #[error("flash engine error: {0}")]
    Engine(String),

    #[error("no device connected")]
    NotConnected,

    #[error("no firmware images downloaded")]
    NoImages,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
