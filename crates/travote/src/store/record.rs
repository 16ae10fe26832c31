use itertools::izip;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use travote_data::Collection;

use super::{DeserializationError, wire};

/// A row type that can be decoded from a scan result.
pub trait Record: Sized {
    const COLLECTION: Collection;

    /// Columns read by [`Record::from_df`], in decoding order.
    fn field_names() -> Vec<&'static str>;

    fn from_df(df: &DataFrame) -> Result<Vec<Self>, DeserializationError>;
}

/// A point of interest.
///
/// Missing text columns decode to empty strings. Coordinates are sent over the
/// wire as JSON strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    /// Region (country) code the place belongs to.
    pub abbr: String,
    pub name: String,
    pub master: String,
    pub category: String,
    pub desc: String,
    #[serde(with = "wire")]
    pub lat: f64,
    #[serde(with = "wire")]
    pub long: f64,
    pub address: String,
    pub postal: String,
    pub contact: String,
    pub hours: String,
    pub website: String,
    pub email: String,
    pub zone: String,
    pub ext_1: String,
}

impl Record for Place {
    const COLLECTION: Collection = Collection::Places;

    fn field_names() -> Vec<&'static str> {
        vec![
            "id", "abbr", "name", "master", "category", "desc", "lat", "long", "address",
            "postal", "contact", "hours", "website", "email", "zone", "ext_1",
        ]
    }

    fn from_df(df: &DataFrame) -> Result<Vec<Self>, DeserializationError> {
        let cols = df.select(Self::field_names())?.take_columns();

        izip!(
            cols[0].str()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
            cols[5].str()?,
            cols[6].f64()?,
            cols[7].f64()?,
        )
        .zip(izip!(
            cols[8].str()?,
            cols[9].str()?,
            cols[10].str()?,
            cols[11].str()?,
            cols[12].str()?,
            cols[13].str()?,
            cols[14].str()?,
            cols[15].str()?,
        ))
        .enumerate()
        .map(
            |(
                row,
                (
                    (id, abbr, name, master, category, desc, lat, long),
                    (address, postal, contact, hours, website, email, zone, ext_1),
                ),
            )|
             -> Result<Self, DeserializationError> {
                Ok(Self {
                    id: required(id, "id", row)?.to_string(),
                    abbr: text(abbr),
                    name: text(name),
                    master: text(master),
                    category: text(category),
                    desc: text(desc),
                    lat: required(lat, "lat", row)?,
                    long: required(long, "long", row)?,
                    address: text(address),
                    postal: text(postal),
                    contact: text(contact),
                    hours: text(hours),
                    website: text(website),
                    email: text(email),
                    zone: text(zone),
                    ext_1: text(ext_1),
                })
            },
        )
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub abbr: String,
    pub name: String,
    #[serde(with = "wire")]
    pub xaxis: i64,
    #[serde(with = "wire")]
    pub yaxis: i64,
}

impl Record for Country {
    const COLLECTION: Collection = Collection::Countries;

    fn field_names() -> Vec<&'static str> {
        vec!["abbr", "name", "xaxis", "yaxis"]
    }

    fn from_df(df: &DataFrame) -> Result<Vec<Self>, DeserializationError> {
        let cols = df.select(Self::field_names())?.take_columns();

        izip!(
            cols[0].str()?,
            cols[1].str()?,
            cols[2].i64()?,
            cols[3].i64()?
        )
        .enumerate()
        .map(|(row, (abbr, name, xaxis, yaxis))| -> Result<Self, DeserializationError> {
            Ok(Self {
                abbr: required(abbr, "abbr", row)?.to_string(),
                name: text(name),
                xaxis: required(xaxis, "xaxis", row)?,
                yaxis: required(yaxis, "yaxis", row)?,
            })
        })
        .collect()
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn required<T>(value: Option<T>, column: &'static str, row: usize) -> Result<T, DeserializationError> {
    value.ok_or(DeserializationError::MissingValue { column, row })
}
