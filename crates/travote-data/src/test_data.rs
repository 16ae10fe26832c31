use std::io::Write;

use tempfile::NamedTempFile;
use tracing::info;

use super::error::Result;

const PLACES_HEADER: &str =
    "id,abbr,name,master,category,desc,lat,long,address,postal,contact,hours,website,email,zone,ext_1";
const COUNTRIES_HEADER: &str = "abbr,name,xaxis,yaxis";

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of rows to include for the places collection
    pub places_rows: usize,
    /// Number of rows to include for the countries collection
    pub countries_rows: usize,
    /// Whether to use realistic data or minimal test data
    pub realistic_data: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests
    pub fn minimal() -> Self {
        Self {
            places_rows: 3,
            countries_rows: 1,
            realistic_data: false,
        }
    }

    /// Sample data for integration tests.
    ///
    /// Covers places on both sides of the antimeridian and close to both poles.
    pub fn sample() -> Self {
        Self {
            places_rows: REALISTIC_PLACES.len(),
            countries_rows: REALISTIC_COUNTRIES.len(),
            realistic_data: true,
        }
    }
}

/// Create test data files in temporary files.
///
/// Returns (places, countries) CSV exports with headers.
pub fn create_test_data(config: &TestDataConfig) -> Result<(NamedTempFile, NamedTempFile)> {
    info!("Creating test data with config: {:?}", config);

    let places = create_places_test_data(config)?;
    let countries = create_countries_test_data(config)?;

    Ok((places, countries))
}

fn create_places_test_data(config: &TestDataConfig) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{PLACES_HEADER}")?;

    let rows: &[PlaceRow] = if config.realistic_data {
        &REALISTIC_PLACES
    } else {
        &MINIMAL_PLACES
    };
    for row in rows.iter().take(config.places_rows) {
        write_place_row(&mut file, row)?;
    }

    file.flush()?;
    Ok(file)
}

fn create_countries_test_data(config: &TestDataConfig) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{COUNTRIES_HEADER}")?;

    let rows: &[CountryRow] = if config.realistic_data {
        &REALISTIC_COUNTRIES
    } else {
        &REALISTIC_COUNTRIES[..1]
    };
    for (abbr, name, xaxis, yaxis) in rows.iter().take(config.countries_rows) {
        writeln!(file, "{abbr},{name},{xaxis},{yaxis}")?;
    }

    file.flush()?;
    Ok(file)
}

// (id, abbr, name, master, category, desc, lat, long, address, postal, zone)
type PlaceRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    f64,
    &'static str,
    &'static str,
    &'static str,
);
type CountryRow = (&'static str, &'static str, i64, i64);

fn write_place_row(file: &mut NamedTempFile, row: &PlaceRow) -> Result<()> {
    let (id, abbr, name, master, category, desc, lat, long, address, postal, zone) = row;
    writeln!(
        file,
        "{id},{abbr},{name},{master},{category},{desc},{lat},{long},{address},{postal},,,,,{zone},"
    )?;
    Ok(())
}

const MINIMAL_PLACES: [PlaceRow; 3] = [
    (
        "sg-001", "SG", "Marina Bay Sands", "Marina Bay", "attraction", "Integrated resort",
        1.2834, 103.8607, "10 Bayfront Avenue", "018956", "Central",
    ),
    (
        "sg-002", "SG", "Gardens by the Bay", "Marina Bay", "nature", "Waterfront gardens",
        1.2816, 103.8636, "18 Marina Gardens Drive", "018953", "Central",
    ),
    (
        "sg-003", "SG", "Singapore Zoo", "Mandai", "attraction", "Rainforest zoo",
        1.4043, 103.7930, "80 Mandai Lake Road", "729826", "North",
    ),
];

const REALISTIC_PLACES: [PlaceRow; 16] = [
    MINIMAL_PLACES[0],
    MINIMAL_PLACES[1],
    MINIMAL_PLACES[2],
    (
        "sg-004", "SG", "Raffles Hotel", "Downtown", "hotel", "Colonial era hotel",
        1.2949, 103.8545, "1 Beach Road", "189673", "Central",
    ),
    (
        "sg-005", "SG", "Jewel Changi Airport", "Changi", "attraction", "Indoor waterfall",
        1.3602, 103.9898, "78 Airport Boulevard", "819666", "East",
    ),
    (
        "fj-001", "FJ", "Waiyevo", "Taveuni", "landmark", "Village on the 180th meridian",
        -16.79, 179.98, "Waiyevo", "", "Northern",
    ),
    (
        "fj-002", "FJ", "Qamea Island", "Taveuni", "nature", "Island just east of the meridian",
        -16.77, -179.77, "Qamea", "", "Northern",
    ),
    (
        "fj-003", "FJ", "Suva Municipal Market", "Suva", "food", "Produce market",
        -18.1365, 178.4255, "Usher Street", "", "Central",
    ),
    (
        "nz-001", "NZ", "Sky Tower", "Auckland", "landmark", "Observation tower",
        -36.8485, 174.7622, "Victoria Street West", "1010", "North Island",
    ),
    (
        "nz-002", "NZ", "Waitangi Wharf", "Chatham Islands", "landmark", "Harbour on the Chathams",
        -43.9535, -176.5597, "Waitangi", "8942", "Chatham",
    ),
    (
        "sj-001", "SJ", "Longyearbyen Church", "Longyearbyen", "landmark", "Northernmost church",
        78.2232, 15.6469, "Vei 230", "9170", "Svalbard",
    ),
    (
        "ca-001", "CA", "Alert Station", "Nunavut", "research", "Northernmost settlement",
        82.5018, -62.3481, "Ellesmere Island", "", "Qikiqtaaluk",
    ),
    (
        "aq-001", "AQ", "Amundsen-Scott Station", "South Pole", "research", "Station at the pole",
        -90.0, 0.0, "Polar Plateau", "", "Antarctic",
    ),
    (
        "fr-001", "FR", "Eiffel Tower", "Paris", "landmark", "Wrought-iron tower",
        48.8584, 2.2945, "Champ de Mars", "75007", "Ile-de-France",
    ),
    (
        "gb-001", "GB", "Big Ben", "London", "landmark", "Clock tower",
        51.5007, -0.1246, "Westminster", "SW1A 0AA", "London",
    ),
    (
        "gb-002", "GB", "Borough Market", "London", "food", "Food market",
        51.5055, -0.0910, "8 Southwark Street", "SE1 1TL", "London",
    ),
];

const REALISTIC_COUNTRIES: [CountryRow; 8] = [
    ("SG", "Singapore", 1038, 13),
    ("FJ", "Fiji", 1784, -180),
    ("NZ", "New Zealand", 1747, -413),
    ("SJ", "Svalbard and Jan Mayen", 160, 782),
    ("CA", "Canada", -1063, 565),
    ("AQ", "Antarctica", 0, -900),
    ("FR", "France", 23, 488),
    ("GB", "United Kingdom", -1, 515),
];
