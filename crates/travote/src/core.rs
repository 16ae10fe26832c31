//! The service facade used by the request handlers.
//!
//! [`Travote`] owns the configuration and the storage client. It is built once
//! at process start and shared by reference across requests.
//!
//! ```rust
//! use travote::{BoundingBoxFilterBuilder, PlaceFilter, Point, Travote, TravoteConfig};
//! use travote::data_processing::{TestDataConfig, TravoteTables};
//!
//! let tables = TravoteTables::from_test_data(&TestDataConfig::sample())?;
//! let travote = Travote::from_tables(TravoteConfig::default(), tables);
//!
//! // Places within one degree of Waiyevo, Fiji, on both sides of the 180th meridian
//! let query = BoundingBoxFilterBuilder::new(Point::new(-16.8, 179.5), 1.0)
//!     .filter(PlaceFilter::ByRegion("FJ".into()))
//!     .build()?;
//! let places = travote.places_near(&query)?;
//! assert_eq!(places.len(), 2);
//! # Ok::<(), travote::error::TravoteError>(())
//! ```

use tracing::{info, instrument};
use travote_data::TravoteTables;

use crate::{
    config::TravoteConfig,
    error::Result,
    geo::{BoundingBoxQuery, result_limit},
    query::{Clause, CountryFilter, Field, PlaceFilter, Predicate},
    store::{Country, Place, PlaceStore},
};

#[derive(Clone)]
pub struct Travote {
    config: TravoteConfig,
    store: PlaceStore,
}

impl Travote {
    /// Load the tables from the data directory (see `travote_data::get_data_dir`).
    #[instrument(name = "Initialize Travote", level = "info", skip(config))]
    pub fn new(config: TravoteConfig) -> Result<Self> {
        let t_init = std::time::Instant::now();
        let tables = TravoteTables::new()?;
        info!(elapsed = ?t_init.elapsed(), "Tables ready");
        Ok(Self::from_tables(config, tables))
    }

    pub fn from_tables(config: TravoteConfig, tables: TravoteTables) -> Self {
        Self {
            config,
            store: PlaceStore::new(tables),
        }
    }

    pub fn config(&self) -> &TravoteConfig {
        &self.config
    }

    pub fn store(&self) -> &PlaceStore {
        &self.store
    }

    /// Places matching an equality filter. [`PlaceFilter::Any`] returns the first `limit` places.
    #[instrument(name = "Get places", level = "info", skip(self))]
    pub fn places(&self, filter: &PlaceFilter, limit: i64) -> Result<Vec<Place>> {
        let limit = result_limit(limit)?;
        let predicate = Predicate::all().and_maybe(filter.clause());
        self.store.find(&predicate, limit)
    }

    /// Places inside a bounding box.
    #[instrument(
        name = "Get places by coordinates",
        level = "info",
        skip_all,
        fields(center = %query.center(), radius = query.radius_degrees(), wrapped = query.longitude().is_wrapped())
    )]
    pub fn places_near(&self, query: &BoundingBoxQuery) -> Result<Vec<Place>> {
        self.store.find(&query.predicate(), query.limit())
    }

    #[instrument(name = "Get countries", level = "info", skip(self))]
    pub fn countries(&self, filter: &CountryFilter, limit: i64) -> Result<Vec<Country>> {
        let limit = result_limit(limit)?;
        let predicate = Predicate::all().and_maybe(filter.clause());
        self.store.find(&predicate, limit)
    }

    /// Whether a place with this id exists in region `abbr`.
    #[instrument(level = "debug", skip(self))]
    pub fn place_exists(&self, id: &str, abbr: &str) -> Result<bool> {
        let predicate = Predicate::all()
            .and(Clause::equals(Field::Id, id))
            .and(Clause::equals(Field::Abbr, abbr));
        let df = self
            .store
            .scan(travote_data::Collection::Places, &predicate, 1)?;
        Ok(df.height() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TravoteError;
    use crate::geo::{BoundingBoxFilterBuilder, InvalidInput, Point};
    use travote_data::TestDataConfig;

    fn setup_test_env() -> Travote {
        let _ = crate::init_logging(tracing::Level::WARN);
        let tables = TravoteTables::from_test_data(&TestDataConfig::sample()).unwrap();
        Travote::from_tables(TravoteConfig::default(), tables)
    }

    #[test]
    fn test_places_by_region() {
        let travote = setup_test_env();
        let places = travote
            .places(&PlaceFilter::ByRegion("GB".into()), 50)
            .unwrap();

        assert_eq!(places.len(), 2);
        assert!(places.iter().all(|p| p.abbr == "GB"));
    }

    #[test]
    fn test_places_by_category_respects_limit() {
        let travote = setup_test_env();
        let places = travote
            .places(&PlaceFilter::ByCategory("landmark".into()), 3)
            .unwrap();

        assert_eq!(places.len(), 3);
        assert!(places.iter().all(|p| p.category == "landmark"));
    }

    #[test]
    fn test_places_by_id() {
        let travote = setup_test_env();
        let places = travote.places(&PlaceFilter::ById("nz-002".into()), 50).unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Waitangi Wharf");
        assert_eq!(places[0].long, -176.5597);
    }

    #[test]
    fn test_places_any_filter() {
        let travote = setup_test_env();
        assert_eq!(travote.places(&PlaceFilter::Any, 1000).unwrap().len(), 16);
    }

    #[test]
    fn test_places_rejects_non_positive_limit() {
        let travote = setup_test_env();
        let result = travote.places(&PlaceFilter::Any, 0);
        assert!(matches!(
            result,
            Err(TravoteError::InvalidInput(InvalidInput::Limit(0)))
        ));
    }

    #[test]
    fn test_places_near_north_pole_region() {
        let travote = setup_test_env();
        let query = BoundingBoxFilterBuilder::new(Point::new(89.0, -62.0), 7.0)
            .build()
            .unwrap();

        let ids: Vec<String> = travote
            .places_near(&query)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["ca-001"]);
    }

    #[test]
    fn test_places_near_west_wrap_reaches_fiji() {
        let travote = setup_test_env();
        let query = BoundingBoxFilterBuilder::new(Point::new(-16.8, -179.8), 0.5)
            .build()
            .unwrap();

        let mut ids: Vec<String> = travote
            .places_near(&query)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["fj-001", "fj-002"]);
    }

    #[test]
    fn test_countries() {
        let travote = setup_test_env();

        let all = travote.countries(&CountryFilter::Any, 10).unwrap();
        assert_eq!(all.len(), 8);

        let nz = travote
            .countries(&CountryFilter::ByName("New Zealand".into()), 10)
            .unwrap();
        assert_eq!(nz.len(), 1);
        assert_eq!(nz[0].abbr, "NZ");

        let none = travote
            .countries(&CountryFilter::ByAbbr("XX".into()), 10)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_place_exists() {
        let travote = setup_test_env();
        assert!(travote.place_exists("fj-002", "FJ").unwrap());
        assert!(!travote.place_exists("fj-002", "NZ").unwrap());
        assert!(!travote.place_exists("missing", "FJ").unwrap());
    }
}
