//! Column layouts of the two stored collections.
//!
//! Places and countries are flat tables. Coordinates are stored as two
//! independent `Float64` columns (`lat`, `long`) so they can be range-filtered
//! without any geospatial support from the storage layer.

use std::fmt;

use polars::prelude::*;

pub const PLACES_SCHEMA: [(PlSmallStr, DataType); 16] = [
    (PlSmallStr::from_static("id"), DataType::String),
    (PlSmallStr::from_static("abbr"), DataType::String),
    (PlSmallStr::from_static("name"), DataType::String),
    (PlSmallStr::from_static("master"), DataType::String),
    (PlSmallStr::from_static("category"), DataType::String),
    (PlSmallStr::from_static("desc"), DataType::String),
    (PlSmallStr::from_static("lat"), DataType::Float64),
    (PlSmallStr::from_static("long"), DataType::Float64),
    (PlSmallStr::from_static("address"), DataType::String),
    (PlSmallStr::from_static("postal"), DataType::String),
    (PlSmallStr::from_static("contact"), DataType::String),
    (PlSmallStr::from_static("hours"), DataType::String),
    (PlSmallStr::from_static("website"), DataType::String),
    (PlSmallStr::from_static("email"), DataType::String),
    (PlSmallStr::from_static("zone"), DataType::String),
    (PlSmallStr::from_static("ext_1"), DataType::String),
];

pub const COUNTRIES_SCHEMA: [(PlSmallStr, DataType); 4] = [
    (PlSmallStr::from_static("abbr"), DataType::String),
    (PlSmallStr::from_static("name"), DataType::String),
    (PlSmallStr::from_static("xaxis"), DataType::Int64),
    (PlSmallStr::from_static("yaxis"), DataType::Int64),
];

/// The collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Places,
    Countries,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Places => "places",
            Self::Countries => "countries",
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            Self::Places => Schema::from_iter(PLACES_SCHEMA),
            Self::Countries => Schema::from_iter(COUNTRIES_SCHEMA),
        }
    }

    /// Column used to order persisted tables.
    pub fn key_column(self) -> &'static str {
        match self {
            Self::Places => "id",
            Self::Countries => "abbr",
        }
    }

    pub fn raw_file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    pub fn parquet_file_name(self) -> String {
        format!("{}.parquet", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
