//! Places around a point
//!
//! Builds bounding-box queries around a few centers, including one that crosses
//! the antimeridian and one next to a pole, and runs them over the sample tables.

use travote::data_processing::{TestDataConfig, TravoteTables};
use travote::{BoundingBoxFilterBuilder, PlaceFilter, Point, Travote, TravoteConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tables = TravoteTables::from_test_data(&TestDataConfig::sample())?;
    let travote = Travote::from_tables(TravoteConfig::default(), tables);

    let searches = [
        ("Singapore", Point::new(1.35, 103.8), 0.5, PlaceFilter::Any),
        (
            "Taveuni (crosses 180°)",
            Point::new(-16.8, 179.5),
            1.0,
            PlaceFilter::Any,
        ),
        (
            "Chatham Islands landmarks",
            Point::new(-44.0, -176.5),
            2.0,
            PlaceFilter::ByCategory("landmark".into()),
        ),
        ("High Arctic", Point::new(88.0, 0.0), 10.0, PlaceFilter::Any),
    ];

    for (label, center, radius, filter) in searches {
        let query = BoundingBoxFilterBuilder::new(center, radius)
            .filter(filter)
            .limit(10)
            .build()?;

        println!("{label}: center {center}, radius {radius}°");
        println!(
            "  lat {:?}, long {:?}",
            query.latitude().bounds(),
            query
                .longitude()
                .ranges()
                .iter()
                .map(|r| r.bounds())
                .collect::<Vec<_>>()
        );

        for place in travote.places_near(&query)? {
            println!("  - {} ({}) at ({}, {})", place.name, place.id, place.lat, place.long);
        }
        println!();
    }

    Ok(())
}
