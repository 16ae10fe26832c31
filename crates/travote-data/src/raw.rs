use std::fs;
use std::path::Path;

use polars::prelude::*;
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::schema::Collection;

pub use super::error::Result;

/// Get the raw CSV exports of both collections.
///
/// Looks for `places.csv` and `countries.csv` in `<DATA_DIR>/raw/`. Found files are
/// copied to temporary files for processing. When they are missing and test data is
/// in use, test data is generated instead; otherwise `RequiredFilesNotFound` is returned.
///
/// Returns a tuple of `NamedTempFile`s: (places, countries).
#[instrument(name = "Get raw collection data", skip_all, level = "info")]
pub fn get_raw_data() -> Result<(NamedTempFile, NamedTempFile)> {
    let raw_dir = crate::get_data_dir().join("raw");
    info!("Checking for raw data in: {}", raw_dir.display());

    let places_path = raw_dir.join(Collection::Places.raw_file_name());
    let countries_path = raw_dir.join(Collection::Countries.raw_file_name());

    if places_path.exists() && countries_path.exists() {
        info!("Found existing raw data files, copying to temp files");
        return copy_files_to_temp(&places_path, &countries_path);
    }

    warn!("Raw data files not found");

    if crate::should_use_test_data() {
        let config = crate::get_test_data_config();
        info!(?config, "Generating test data in place of raw exports");
        return crate::test_data::create_test_data(&config);
    }

    Err(crate::DataError::RequiredFilesNotFound(
        raw_dir.display().to_string(),
    ))
}

fn copy_files_to_temp(
    places_path: &Path,
    countries_path: &Path,
) -> Result<(NamedTempFile, NamedTempFile)> {
    let places_temp = NamedTempFile::new()?;
    let countries_temp = NamedTempFile::new()?;

    fs::copy(places_path, places_temp.path())?;
    fs::copy(countries_path, countries_temp.path())?;

    Ok((places_temp, countries_temp))
}

/// Read a collection export (comma separated, with header) using the collection schema.
pub fn get_collection_df(collection: Collection, path: impl AsRef<Path>) -> Result<LazyFrame> {
    Ok(LazyCsvReader::new(path)
        .with_separator(b',')
        .with_has_header(true)
        .with_schema(Some(collection.schema().into()))
        .finish()?)
}

pub fn get_places_df(path: impl AsRef<Path>) -> Result<LazyFrame> {
    get_collection_df(Collection::Places, path)
}

pub fn get_countries_df(path: impl AsRef<Path>) -> Result<LazyFrame> {
    get_collection_df(Collection::Countries, path)
}

#[instrument(name = "Read raw collection data", skip_all, level = "info")]
pub fn get_raw_data_as_lazy_frames<T: AsRef<Path>>(raw_data: &(T, T)) -> Result<(LazyFrame, LazyFrame)> {
    let places_df = get_places_df(raw_data.0.as_ref())?;
    let countries_df = get_countries_df(raw_data.1.as_ref())?;
    Ok((places_df, countries_df))
}
