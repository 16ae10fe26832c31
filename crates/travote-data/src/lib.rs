use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod raw;
pub mod schema;
pub mod tables;
pub mod test_data;

static TEST_DATA_DIR: Lazy<tempfile::TempDir> = Lazy::new(|| {
    tempfile::TempDir::new().expect("Failed to create global temporary test data directory")
});

pub const DATA_DIR_DEFAULT: &str = "./travote_data";

/// Centralized function to determine if we should use test data.
pub fn should_use_test_data() -> bool {
    let is_test_environment = cfg!(test) || cfg!(doctest);

    #[cfg(feature = "test_data")]
    let explicit_test_data = std::env::var("USE_TEST_DATA")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    #[cfg(not(feature = "test_data"))]
    let explicit_test_data = false;

    is_test_environment || explicit_test_data
}

/// Get the appropriate test data config based on environment.
pub fn get_test_data_config() -> test_data::TestDataConfig {
    match std::env::var("TEST_DATA_SIZE").as_deref() {
        Ok("minimal") => test_data::TestDataConfig::minimal(),
        _ => test_data::TestDataConfig::sample(),
    }
}

/// Global data directory path that automatically determines the appropriate location.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if should_use_test_data() {
        let temp_dir = TEST_DATA_DIR.path().to_path_buf();
        warn!(temp_dir = ?temp_dir, "Using temporary data directory for tests");
        temp_dir
    } else {
        let dir = std::env::var("DATA_DIR").unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string());
        PathBuf::from(dir)
    }
});

pub fn get_data_dir() -> &'static Path {
    DATA_DIR.as_path()
}

mod error {
    use polars::prelude::PolarsError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Polars error: {0}")]
        Polars(#[from] PolarsError),
        #[error("Required data files not found in {0}")]
        RequiredFilesNotFound(String),
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use error::{DataError, Result};

pub use schema::Collection;
pub use tables::TravoteTables;
pub use test_data::{TestDataConfig, create_test_data};
