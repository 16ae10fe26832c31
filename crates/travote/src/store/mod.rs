//! Predicate execution over the places and countries tables.

use polars::prelude::*;
use tracing::{debug, instrument};
use travote_data::{Collection, TravoteTables};

use crate::query::Predicate;

mod record;
mod wire;

pub use error::{DeserializationError, StorageError};
pub use record::{Country, Place, Record};

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum StorageError {
        #[error("Data error: {0}")]
        Data(#[from] travote_data::DataError),
        #[error("Query execution failed: {0}")]
        Polars(#[from] polars::prelude::PolarsError),
    }

    #[derive(Error, Debug)]
    pub enum DeserializationError {
        #[error("Unexpected row layout: {0}")]
        Layout(#[from] polars::prelude::PolarsError),
        #[error("Required column `{column}` is null in row {row}")]
        MissingValue { column: &'static str, row: usize },
    }
}

/// Storage client shared by every request.
///
/// Cloning is cheap: clones share the lazily loaded tables.
#[derive(Clone)]
pub struct PlaceStore {
    tables: TravoteTables,
}

impl PlaceStore {
    pub fn new(tables: TravoteTables) -> Self {
        Self { tables }
    }

    /// Evaluate `predicate` against a collection, returning at most `limit` rows.
    #[instrument(name = "Scan collection", level = "debug", skip(self, predicate), fields(clauses = predicate.clauses().len()))]
    pub fn scan(
        &self,
        collection: Collection,
        predicate: &Predicate,
        limit: usize,
    ) -> Result<DataFrame, StorageError> {
        let t_scan = std::time::Instant::now();
        let limit = IdxSize::try_from(limit).unwrap_or(IdxSize::MAX);

        let df = self
            .tables
            .collection_df(collection)?
            .clone()
            .filter(predicate.to_expr())
            .limit(limit)
            .collect()?;

        debug!(rows = df.height(), elapsed = ?t_scan.elapsed(), "Scan complete");
        Ok(df)
    }

    /// Scan and decode rows into records.
    pub fn find<R: Record>(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> crate::error::Result<Vec<R>> {
        let df = self.scan(R::COLLECTION, predicate, limit)?;
        Ok(R::from_df(&df)?)
    }
}
