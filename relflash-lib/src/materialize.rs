//! Release materialization: download a release's partitions into
//! ready-to-flash images.

use crate::FirmwareImage;
use crate::catalog::Release;
use crate::error::{Error, Result};
use crate::fetch::BlobFetcher;
use crate::utils;

/// Download every partition of `release`, strictly sequentially and in
/// manifest order, and return the assembled image list.
///
/// All-or-nothing: the first failed fetch or unparsable offset aborts the
/// remaining partitions and returns `Err`, so a partial list can never be
/// handed to the flash session.
pub fn materialize_release(
    fetcher: &dyn BlobFetcher,
    release: &Release,
) -> Result<Vec<FirmwareImage>> {
    tracing::info!(release = %release.name, "downloading release");

    let mut images = Vec::with_capacity(release.partitions.len());
    for partition in &release.partitions {
        tracing::info!(partition = %partition.name, url = %partition.url, "downloading partition");
        let data = fetcher
            .fetch(&partition.url)
            .map_err(|err| Error::PartitionFetch {
                name: partition.name.clone(),
                reason: err.to_string(),
            })?;
        let address = utils::parse_offset(&partition.offset)?;
        images.push(FirmwareImage::new(data, address));
    }

    tracing::info!(count = images.len(), "download done");
    Ok(images)
}
