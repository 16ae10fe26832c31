use tracing::{instrument, trace};

use super::{
    InvalidInput, LONG_PERIOD, MAX_LAT, MAX_LONG, MIN_LAT, MIN_LONG, Point, result_limit,
};
use crate::query::{Clause, Field, PlaceFilter, Predicate};

/// Result limit used when the caller does not set one.
pub const DEFAULT_RESULT_LIMIT: i64 = 50;

/// An inclusive `[low, high]` range over one numeric field.
///
/// `low <= high` always holds; the only way to obtain a range is through
/// [`NormalizedRange::new`], which rejects inverted or NaN bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRange {
    field: Field,
    low: f64,
    high: f64,
}

impl NormalizedRange {
    pub fn new(field: Field, low: f64, high: f64) -> Result<Self, InvalidInput> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(InvalidInput::InvertedRange {
                field: field.column(),
                low,
                high,
            });
        }
        Ok(Self { field, low, high })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The longitude part of a bounding box.
///
/// A box that crosses the ±180° meridian cannot be written as one range, so it is
/// kept as two contiguous ranges whose union is the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeSpan {
    Single(NormalizedRange),
    Wrapped(NormalizedRange, NormalizedRange),
}

impl LongitudeSpan {
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(..))
    }

    pub fn ranges(&self) -> Vec<NormalizedRange> {
        match self {
            Self::Single(range) => vec![*range],
            Self::Wrapped(first, second) => vec![*first, *second],
        }
    }

    pub fn contains(&self, longitude: f64) -> bool {
        match self {
            Self::Single(range) => range.contains(longitude),
            Self::Wrapped(first, second) => first.contains(longitude) || second.contains(longitude),
        }
    }

    pub fn clause(&self) -> Clause {
        match self {
            Self::Single(range) => Clause::Range(*range),
            Self::Wrapped(first, second) => Clause::Either(*first, *second),
        }
    }
}

/// A validated, normalized "places around a point" query.
///
/// Built once per request by [`BoundingBoxFilterBuilder`] and handed to the store,
/// which evaluates [`BoundingBoxQuery::predicate`] and returns at most
/// [`BoundingBoxQuery::limit`] places.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBoxQuery {
    filter: PlaceFilter,
    center: Point,
    radius_degrees: f64,
    limit: usize,
    latitude: NormalizedRange,
    longitude: LongitudeSpan,
}

impl BoundingBoxQuery {
    pub fn builder(center: Point, radius_degrees: f64) -> BoundingBoxFilterBuilder {
        BoundingBoxFilterBuilder::new(center, radius_degrees)
    }

    pub fn filter(&self) -> &PlaceFilter {
        &self.filter
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius_degrees(&self) -> f64 {
        self.radius_degrees
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn latitude(&self) -> &NormalizedRange {
        &self.latitude
    }

    pub fn longitude(&self) -> &LongitudeSpan {
        &self.longitude
    }

    /// `equality AND lat AND (long | longA OR longB)`, equality omitted for [`PlaceFilter::Any`].
    pub fn predicate(&self) -> Predicate {
        Predicate::all()
            .and_maybe(self.filter.clause())
            .and(Clause::Range(self.latitude))
            .and(self.longitude.clause())
    }

    /// Whether a point lies inside the box. Ignores the equality filter.
    pub fn contains(&self, point: Point) -> bool {
        self.latitude.contains(point.latitude) && self.longitude.contains(point.longitude)
    }
}

/// Builds a [`BoundingBoxQuery`] from a center, a radius in degrees, an optional
/// equality filter and a result limit.
///
/// # Examples
///
/// ```rust
/// use travote::{BoundingBoxFilterBuilder, PlaceFilter, Point};
///
/// let query = BoundingBoxFilterBuilder::new(Point::new(0.0, 179.5), 1.0)
///     .filter(PlaceFilter::ByRegion("FJ".into()))
///     .limit(20)
///     .build()?;
///
/// assert!(query.longitude().is_wrapped());
/// # Ok::<(), travote::geo::InvalidInput>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoundingBoxFilterBuilder {
    filter: PlaceFilter,
    center: Point,
    radius_degrees: f64,
    limit: i64,
}

impl BoundingBoxFilterBuilder {
    pub fn new(center: Point, radius_degrees: f64) -> Self {
        Self {
            filter: PlaceFilter::Any,
            center,
            radius_degrees,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Restrict matches with an equality clause.
    pub fn filter(mut self, filter: PlaceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Maximum number of places the executor may return. Passed through untouched.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    #[instrument(level = "trace", skip(self), fields(center = %self.center, radius = self.radius_degrees))]
    pub fn build(self) -> Result<BoundingBoxQuery, InvalidInput> {
        if !self.radius_degrees.is_finite() || self.radius_degrees < 0.0 {
            return Err(InvalidInput::Radius(self.radius_degrees));
        }
        let limit = result_limit(self.limit)?;
        self.center.validate()?;

        let latitude = latitude_range(self.center.latitude, self.radius_degrees)?;
        let longitude = longitude_span(self.center.longitude, self.radius_degrees)?;
        trace!(?latitude, ?longitude, "Normalized bounding box");

        Ok(BoundingBoxQuery {
            filter: self.filter,
            center: self.center,
            radius_degrees: self.radius_degrees,
            limit,
            latitude,
            longitude,
        })
    }
}

/// Latitude does not wrap: the poles are not neighbours, so the range is clamped.
fn latitude_range(latitude: f64, radius: f64) -> Result<NormalizedRange, InvalidInput> {
    let min_lat = (latitude - radius).max(MIN_LAT);
    let max_lat = (latitude + radius).min(MAX_LAT);
    NormalizedRange::new(Field::Lat, min_lat, max_lat)
}

/// Longitude is cyclic with period 360 and represented on [-180, 180].
///
/// Only one branch ever fires. A radius of 180° or more exceeds both bounds; the
/// west branch handles it and the clamps keep both halves inside the domain.
fn longitude_span(longitude: f64, radius: f64) -> Result<LongitudeSpan, InvalidInput> {
    let min_long = longitude - radius;
    let max_long = longitude + radius;

    if min_long < MIN_LONG {
        let wrapped_min = (min_long + LONG_PERIOD).max(MIN_LONG);
        Ok(LongitudeSpan::Wrapped(
            NormalizedRange::new(Field::Long, MIN_LONG, max_long.min(MAX_LONG))?,
            NormalizedRange::new(Field::Long, wrapped_min, MAX_LONG)?,
        ))
    } else if max_long > MAX_LONG {
        let wrapped_max = (max_long - LONG_PERIOD).min(MAX_LONG);
        Ok(LongitudeSpan::Wrapped(
            NormalizedRange::new(Field::Long, min_long, MAX_LONG)?,
            NormalizedRange::new(Field::Long, MIN_LONG, wrapped_max)?,
        ))
    } else {
        Ok(LongitudeSpan::Single(NormalizedRange::new(
            Field::Long,
            min_long,
            max_long,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_bounds(range: &NormalizedRange, low: f64, high: f64) {
        assert!(
            (range.low() - low).abs() < EPS && (range.high() - high).abs() < EPS,
            "expected [{low}, {high}], got [{}, {}]",
            range.low(),
            range.high()
        );
    }

    fn build(lat: f64, long: f64, radius: f64) -> BoundingBoxQuery {
        BoundingBoxFilterBuilder::new(Point::new(lat, long), radius)
            .build()
            .unwrap()
    }

    #[test]
    fn test_no_wraparound() {
        let query = build(1.35, 103.8, 0.5);

        assert_eq!(query.latitude().field(), Field::Lat);
        assert_bounds(query.latitude(), 0.85, 1.85);
        let LongitudeSpan::Single(long) = query.longitude() else {
            panic!("expected a single longitude range");
        };
        assert_eq!(long.field(), Field::Long);
        assert_bounds(long, 103.3, 104.3);
    }

    #[test]
    fn test_east_wraparound() {
        let query = build(0.0, 179.5, 1.0);

        let LongitudeSpan::Wrapped(first, second) = query.longitude() else {
            panic!("expected a wrapped longitude span");
        };
        assert_bounds(first, 178.5, 180.0);
        assert_bounds(second, -180.0, -179.5);
    }

    #[test]
    fn test_west_wraparound() {
        let query = build(0.0, -179.5, 1.0);

        let LongitudeSpan::Wrapped(first, second) = query.longitude() else {
            panic!("expected a wrapped longitude span");
        };
        assert_bounds(first, -180.0, -178.5);
        assert_bounds(second, 179.5, 180.0);
    }

    #[test]
    fn test_north_pole_clamp() {
        let query = build(89.5, 0.0, 2.0);
        assert_bounds(query.latitude(), 87.5, 90.0);
    }

    #[test]
    fn test_south_pole_clamp() {
        let query = build(-89.0, 10.0, 3.0);
        assert_bounds(query.latitude(), -90.0, -86.0);
    }

    #[test]
    fn test_zero_radius_is_exact_match() {
        let query = build(1.35, 103.8, 0.0);

        assert_bounds(query.latitude(), 1.35, 1.35);
        assert_eq!(
            query.longitude().ranges(),
            vec![NormalizedRange::new(Field::Long, 103.8, 103.8).unwrap()]
        );
        assert!(query.contains(Point::new(1.35, 103.8)));
        assert!(!query.contains(Point::new(1.35, 103.81)));
    }

    #[test]
    fn test_center_on_meridian_wraps_in_exceeding_direction() {
        let east = build(0.0, 180.0, 0.5);
        let LongitudeSpan::Wrapped(first, second) = east.longitude() else {
            panic!("expected a wrapped longitude span");
        };
        assert_bounds(first, 179.5, 180.0);
        assert_bounds(second, -180.0, -179.5);

        let west = build(0.0, -180.0, 0.5);
        let LongitudeSpan::Wrapped(first, second) = west.longitude() else {
            panic!("expected a wrapped longitude span");
        };
        assert_bounds(first, -180.0, -179.5);
        assert_bounds(second, 179.5, 180.0);
    }

    #[test]
    fn test_center_on_meridian_with_zero_radius_does_not_wrap() {
        assert!(!build(0.0, 180.0, 0.0).longitude().is_wrapped());
        assert!(!build(0.0, -180.0, 0.0).longitude().is_wrapped());
    }

    #[test]
    fn test_box_touching_meridian_does_not_wrap() {
        let query = build(0.0, 179.0, 1.0);
        assert_eq!(
            query.longitude(),
            &LongitudeSpan::Single(NormalizedRange::new(Field::Long, 178.0, 180.0).unwrap())
        );
    }

    #[test]
    fn test_huge_radius_stays_inside_domain() {
        let query = build(10.0, 0.0, 200.0);

        assert_bounds(query.latitude(), -90.0, 90.0);
        let LongitudeSpan::Wrapped(first, second) = query.longitude() else {
            panic!("expected a wrapped longitude span");
        };
        assert_bounds(first, -180.0, 180.0);
        assert_bounds(second, 160.0, 180.0);
    }

    #[test]
    fn test_ranges_stay_ordered_and_in_domain() {
        let centers = [-90.0, -89.9, -45.0, 0.0, 12.3, 89.99, 90.0];
        let longs = [-180.0, -179.9, -120.0, 0.0, 103.8, 179.5, 180.0];
        let radii = [0.0, 0.1, 0.5, 1.0, 45.0, 179.9, 180.0, 360.0, 1000.0];

        for lat in centers {
            for long in longs {
                for radius in radii {
                    let query = build(lat, long, radius);

                    let (lo, hi) = query.latitude().bounds();
                    assert!(MIN_LAT <= lo && lo <= hi && hi <= MAX_LAT);

                    for range in query.longitude().ranges() {
                        let (lo, hi) = range.bounds();
                        assert!(
                            MIN_LONG <= lo && lo <= hi && hi <= MAX_LONG,
                            "({lat}, {long}) r={radius}: [{lo}, {hi}]"
                        );
                    }

                    let exceeds = long - radius < MIN_LONG || long + radius > MAX_LONG;
                    assert_eq!(query.longitude().is_wrapped(), exceeds);
                    assert!(query.contains(Point::new(lat, long)));
                }
            }
        }
    }

    #[test]
    fn test_wrapped_box_contains_points_across_meridian() {
        let query = build(-16.8, 179.5, 1.0);

        assert!(query.contains(Point::new(-16.79, 179.98)));
        assert!(query.contains(Point::new(-16.77, -179.77)));
        assert!(!query.contains(Point::new(-16.77, -179.0)));
        assert!(!query.contains(Point::new(-16.77, 178.0)));
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let result = BoundingBoxFilterBuilder::new(Point::new(0.0, 0.0), -0.1).build();
        assert_eq!(result, Err(InvalidInput::Radius(-0.1)));
    }

    #[test]
    fn test_non_finite_radius_is_rejected() {
        for radius in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = BoundingBoxFilterBuilder::new(Point::new(0.0, 0.0), radius).build();
            assert!(matches!(result, Err(InvalidInput::Radius(_))));
        }
    }

    #[test]
    fn test_non_positive_limit_is_rejected() {
        for limit in [0, -1, i64::MIN] {
            let result = BoundingBoxFilterBuilder::new(Point::new(0.0, 0.0), 1.0)
                .limit(limit)
                .build();
            assert_eq!(result, Err(InvalidInput::Limit(limit)));
        }
    }

    #[test]
    fn test_invalid_center_is_rejected() {
        let result = BoundingBoxFilterBuilder::new(Point::new(91.0, 0.0), 1.0).build();
        assert_eq!(result, Err(InvalidInput::Latitude(91.0)));

        let result = BoundingBoxFilterBuilder::new(Point::new(0.0, 181.0), 1.0).build();
        assert_eq!(result, Err(InvalidInput::Longitude(181.0)));
    }

    #[test]
    fn test_limit_is_passed_through() {
        let query = BoundingBoxFilterBuilder::new(Point::new(0.0, 0.0), 1.0)
            .limit(1_000_000)
            .build()
            .unwrap();
        assert_eq!(query.limit(), 1_000_000);
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = BoundingBoxFilterBuilder::new(Point::new(0.0, 179.5), 1.0)
            .filter(PlaceFilter::ByRegion("FJ".into()))
            .limit(10);

        let first = builder.clone().build().unwrap();
        let second = builder.build().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.predicate(), second.predicate());
    }

    #[test]
    fn test_predicate_shape_with_filter() {
        let query = BoundingBoxFilterBuilder::new(Point::new(0.0, 179.5), 1.0)
            .filter(PlaceFilter::ByRegion("FJ".into()))
            .build()
            .unwrap();

        let clauses = query.predicate().into_clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(
            clauses[0],
            Clause::Equals {
                field: Field::Abbr,
                value: "FJ".into()
            }
        );
        assert!(matches!(clauses[1], Clause::Range(r) if r.field() == Field::Lat));
        assert!(matches!(clauses[2], Clause::Either(a, b) if a.field() == Field::Long && b.field() == Field::Long));
    }

    #[test]
    fn test_predicate_shape_without_filter() {
        let clauses = build(1.35, 103.8, 0.5).predicate().into_clauses();
        assert_eq!(clauses.len(), 2);
        assert!(matches!(clauses[1], Clause::Range(r) if r.field() == Field::Long));
    }

    #[test]
    fn test_normalized_range_rejects_inverted_bounds() {
        assert!(NormalizedRange::new(Field::Lat, 1.0, 0.0).is_err());
        assert!(NormalizedRange::new(Field::Lat, f64::NAN, 0.0).is_err());
        assert!(NormalizedRange::new(Field::Lat, 0.0, f64::NAN).is_err());
        assert!(NormalizedRange::new(Field::Lat, 0.0, 0.0).is_ok());
    }
}
