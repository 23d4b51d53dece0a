//! Blob fetching seam.
//!
//! Catalog loading and release materialization go through [`BlobFetcher`]
//! so that tests can substitute a scripted fetcher and so that fetch
//! failures are always explicit `Result`s, never swallowed.

use crate::error::Result;

pub trait BlobFetcher {
    /// Fetch the body at `url`. Relative URLs are resolved by the
    /// implementation (against the release server for HTTP).
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher over a blocking reqwest client.
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

impl BlobFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve(url);
        tracing::debug!(%url, "fetching");
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
