use std::collections::HashMap;

use relflash_lib::catalog::{Catalog, MANIFEST_PATH};
use relflash_lib::{BlobFetcher, Error, Result};

/// Fetcher serving canned bodies by URL.
struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
}

impl FakeFetcher {
    fn with_manifest(body: &str) -> Self {
        let mut responses = HashMap::new();
        responses.insert(MANIFEST_PATH.to_string(), body.as_bytes().to_vec());
        Self { responses }
    }
}

impl BlobFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::invalid_input(format!("404 {url}")))
    }
}

const MANIFEST: &str = r#"[
    {"name": "v1.0", "partitions": [
        {"name": "bootloader", "url": "/bin/v1.0/bootloader.bin", "offset": "0x1000"},
        {"name": "app", "url": "/bin/v1.0/app.bin", "offset": "0x10000"}
    ]},
    {"name": "v1.1", "partitions": [
        {"name": "app", "url": "/bin/v1.1/app.bin", "offset": "65536"}
    ]}
]"#;

#[test]
fn test_load_preserves_manifest_order() {
    let catalog = Catalog::load(&FakeFetcher::with_manifest(MANIFEST)).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.releases()[0].name, "v1.0");
    assert_eq!(catalog.releases()[1].name, "v1.1");

    let v1 = catalog.get(0).unwrap();
    assert_eq!(v1.partitions.len(), 2);
    assert_eq!(v1.partitions[0].name, "bootloader");
    assert_eq!(v1.partitions[1].url, "/bin/v1.0/app.bin");
    assert_eq!(v1.partitions[1].offset, "0x10000");
}

#[test]
fn test_unreachable_manifest_is_a_catalog_error() {
    let fetcher = FakeFetcher {
        responses: HashMap::new(),
    };
    let err = Catalog::load(&fetcher).unwrap_err();
    assert!(matches!(err, Error::CatalogFetch(_)), "got {err:?}");
}

#[test]
fn test_malformed_manifest_is_a_parse_error() {
    let fetcher = FakeFetcher::with_manifest(r#"{"not": "an array"}"#);
    let err = Catalog::load(&fetcher).unwrap_err();
    assert!(matches!(err, Error::Json(_)), "got {err:?}");
}

#[test]
fn test_empty_manifest_yields_empty_catalog() {
    let catalog = Catalog::load(&FakeFetcher::with_manifest("[]")).unwrap();
    assert!(catalog.is_empty());
    let err = catalog.get(0).unwrap_err();
    assert!(matches!(err, Error::ReleaseIndex { index: 0, len: 0 }));
}

#[test]
fn test_index_out_of_range() {
    let catalog = Catalog::load(&FakeFetcher::with_manifest(MANIFEST)).unwrap();
    let err = catalog.get(5).unwrap_err();
    assert!(matches!(err, Error::ReleaseIndex { index: 5, len: 2 }));
}

#[test]
fn test_find_by_name_and_index() {
    let catalog = Catalog::load(&FakeFetcher::with_manifest(MANIFEST)).unwrap();

    assert_eq!(catalog.find("v1.1").unwrap().name, "v1.1");
    assert_eq!(catalog.find("0").unwrap().name, "v1.0");
    assert!(matches!(
        catalog.find("v9.9").unwrap_err(),
        Error::InvalidInput(_)
    ));
}
