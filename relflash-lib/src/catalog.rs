//! Release catalog: the manifest of flashable firmware builds.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fetch::BlobFetcher;

/// Path of the release manifest on the release server.
pub const MANIFEST_PATH: &str = "/api/releases.json";

/// One binary image inside a release and its target flash address.
///
/// `offset` stays textual as served by the manifest (decimal or
/// `0x`-prefixed hex); it is parsed during materialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Partition {
    pub name: String,
    pub url: String,
    pub offset: String,
}

/// One flashable firmware build.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub name: String,
    pub partitions: Vec<Partition>,
}

/// Ordered set of releases, loaded once from the manifest and read-only
/// thereafter.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    releases: Vec<Release>,
}

impl Catalog {
    /// Fetch and parse the release manifest.
    ///
    /// An unreachable manifest surfaces as [`Error::CatalogFetch`], an
    /// unparsable one as [`Error::Json`]; neither is swallowed.
    pub fn load(fetcher: &dyn BlobFetcher) -> Result<Self> {
        let body = fetcher
            .fetch(MANIFEST_PATH)
            .map_err(|err| Error::CatalogFetch(err.to_string()))?;
        let releases: Vec<Release> = serde_json::from_slice(&body)?;
        tracing::info!(count = releases.len(), "loaded release catalog");
        Ok(Self { releases })
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Look up a release by catalog index.
    pub fn get(&self, index: usize) -> Result<&Release> {
        self.releases.get(index).ok_or(Error::ReleaseIndex {
            index,
            len: self.releases.len(),
        })
    }

    /// Look up a release by name, or by index if `selector` is numeric.
    pub fn find(&self, selector: &str) -> Result<&Release> {
        if let Ok(index) = selector.parse::<usize>() {
            return self.get(index);
        }
        self.releases
            .iter()
            .find(|release| release.name == selector)
            .ok_or_else(|| Error::invalid_input(format!("no release named `{selector}`")))
    }
}
