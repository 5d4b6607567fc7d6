//! Helpers for the unit tests.
use std::path::PathBuf;

/// Path to a file in the migrate fixtures directory.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../fixtures/migrate")
        .join(name)
}
