//! Travote - places, countries and votes for a travel guide
//!
//! Travote serves points of interest and countries out of two flat tables and
//! answers "what is around here?" queries. A search radius is turned into a
//! bounding box of plain range clauses; boxes that cross the 180th meridian are
//! split in two and boxes that reach a pole are clamped, so every query runs as
//! an ordinary filter over the `lat`/`long` columns.
//!
//! # Quick Start
//!
//! ```rust
//! use travote::{BoundingBoxFilterBuilder, LongitudeSpan, Point};
//!
//! // One degree around a point just west of the antimeridian
//! let query = BoundingBoxFilterBuilder::new(Point::new(0.0, 179.5), 1.0)
//!     .limit(20)
//!     .build()?;
//!
//! let LongitudeSpan::Wrapped(east, west) = query.longitude() else {
//!     unreachable!()
//! };
//! assert_eq!(east.bounds(), (178.5, 180.0));
//! assert_eq!(west.bounds(), (-180.0, -179.5));
//! # Ok::<(), travote::error::TravoteError>(())
//! ```
//!
//! # Data
//!
//! Tables are read from `<DATA_DIR>/processed/*.parquet`, built on first use from
//! the CSV exports in `<DATA_DIR>/raw/`. See [`data_processing`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod api;
pub mod auth;
mod config;
mod core;
pub mod error;
pub mod geo;
pub mod query;
pub mod store;

pub use core::Travote;

pub use api::{ApiRequest, ApiResponse, handle_countries, handle_places, handle_vote};
pub use auth::{FacebookVerifier, TokenVerifier};
pub use config::{TravoteConfig, TravoteConfigBuilder};
pub use geo::{BoundingBoxFilterBuilder, BoundingBoxQuery, LongitudeSpan, NormalizedRange, Point};
pub use polars;
pub use query::{CountryFilter, PlaceFilter, Predicate};
pub use store::{Country, Place, PlaceStore};
pub use travote_data as data_processing;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for Travote.
///
/// Installs a `fmt` subscriber writing to stderr, honouring `RUST_LOG` and
/// falling back to `level`. Later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use travote::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), travote::error::TravoteError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::TravoteError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
