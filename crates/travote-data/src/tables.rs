use super::error::Result;
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

use crate::schema::Collection;
use crate::test_data::TestDataConfig;

/// The two stored collections, backed by Parquet files and read into memory on first use.
#[derive(Clone)]
pub struct TravoteTables {
    places_path: PathBuf,
    countries_path: PathBuf,
    places_df: OnceCell<LazyFrame>,
    countries_df: OnceCell<LazyFrame>,
}

impl TravoteTables {
    pub fn new() -> Result<Self> {
        Self::new_with_persistent_data()
    }

    fn new_with_persistent_data() -> Result<Self> {
        info!("TravoteTables: Using persistent data storage");

        let processed_dir = crate::get_data_dir().join("processed");
        std::fs::create_dir_all(&processed_dir)?;

        let places_path = processed_dir.join(Collection::Places.parquet_file_name());
        let countries_path = processed_dir.join(Collection::Countries.parquet_file_name());

        if places_path.exists() && countries_path.exists() {
            info!("TravoteTables: Loading existing Parquet files");
            return Ok(Self::load_parquet_files(places_path, countries_path));
        }

        info!("TravoteTables: Generating Parquet tables from raw exports");

        let (places_df, countries_df) = {
            let _span = info_span!("Ingest Raw Data").entered();
            let raw_data = super::raw::get_raw_data()?;
            Self::ingest_raw(&raw_data)?
        };

        Self::save_df_to_parquet(Collection::Places, places_df, &places_path)?;
        Self::save_df_to_parquet(Collection::Countries, countries_df, &countries_path)?;

        Ok(Self::load_parquet_files(places_path, countries_path))
    }

    /// Build tables from frames that are already in memory.
    ///
    /// Nothing is written to disk; the frames are served as-is.
    pub fn from_frames(places: LazyFrame, countries: LazyFrame) -> Self {
        Self {
            places_path: PathBuf::new(),
            countries_path: PathBuf::new(),
            places_df: OnceCell::with_value(places),
            countries_df: OnceCell::with_value(countries),
        }
    }

    /// Build in-memory tables from generated test data.
    pub fn from_test_data(config: &TestDataConfig) -> Result<Self> {
        let files = crate::test_data::create_test_data(config)?;
        let (places_lf, countries_lf) = super::raw::get_raw_data_as_lazy_frames(&files)?;
        // The CSV scans read from temp files, so collect before they are dropped.
        Ok(Self::from_frames(
            places_lf.collect()?.lazy(),
            countries_lf.collect()?.lazy(),
        ))
    }

    /// Collect the raw CSV scans, one after the other.
    ///
    /// `collect_all` never returns when the polars pool has a single thread.
    fn ingest_raw<P: AsRef<Path>>(raw_data: &(P, P)) -> Result<(DataFrame, DataFrame)> {
        let (places_lf, countries_lf) = super::raw::get_raw_data_as_lazy_frames(raw_data)?;
        Ok((places_lf.collect()?, countries_lf.collect()?))
    }

    fn save_df_to_parquet(collection: Collection, df: DataFrame, path: &Path) -> Result<()> {
        let sink_time = std::time::Instant::now();

        let key = collection.key_column();
        let mut df = df
            .lazy()
            .drop_nulls(Some(vec![key.into()]))
            .sort([key], SortMultipleOptions::default())
            .collect()?;
        let mut file = std::fs::File::create(path)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;

        info!(
            %collection,
            path = ?path.file_stem(),
            rows = df.height(),
            sink_time = ?sink_time.elapsed(),
            "Saved to parquet file"
        );
        Ok(())
    }

    fn load_parquet_files(places_path: PathBuf, countries_path: PathBuf) -> Self {
        Self {
            places_path,
            countries_path,
            places_df: OnceCell::new(),
            countries_df: OnceCell::new(),
        }
    }

    fn get_data(path: &Path) -> Result<LazyFrame> {
        info!(
            path = ?path.file_stem(),
            "Loading and collecting into memory for the first time..."
        );
        let t_load = std::time::Instant::now();
        let df = LazyFrame::scan_parquet(path, Default::default())?
            .collect()
            .map(DataFrame::lazy)
            .map_err(From::from);
        info!(
            time_collected = ?t_load.elapsed(),
            "Collected into memory"
        );
        df
    }

    pub fn places_df(&self) -> Result<&LazyFrame> {
        self.places_df
            .get_or_try_init(|| Self::get_data(&self.places_path))
    }

    pub fn countries_df(&self) -> Result<&LazyFrame> {
        self.countries_df
            .get_or_try_init(|| Self::get_data(&self.countries_path))
    }

    pub fn collection_df(&self, collection: Collection) -> Result<&LazyFrame> {
        match collection {
            Collection::Places => self.places_df(),
            Collection::Countries => self.countries_df(),
        }
    }
}
