//! Integration tests against the fixture definition directories.

use std::path::PathBuf;

pub mod loader_test;
pub mod router_test;

/// Path of a directory under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
