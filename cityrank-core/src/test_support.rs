//! Test-only catalog sources and sample cities used by unit and behaviour
//! tests.

use geo::Point;

use crate::{Catalog, CatalogError, CatalogSource, CityId, CityRecord, Indicator};

/// In-memory `CatalogSource` implementation used in tests.
#[derive(Default, Debug, Clone)]
pub struct MemoryCatalog {
    records: Vec<CityRecord>,
}

impl MemoryCatalog {
    /// Create a source serving `records`.
    pub fn new(records: Vec<CityRecord>) -> Self {
        Self { records }
    }
}

impl CatalogSource for MemoryCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Ok(Catalog::from_records(self.records.clone()))
    }
}

/// `CatalogSource` that always fails to read.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingCatalog;

impl CatalogSource for FailingCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Err(CatalogError::Read {
            name: "unavailable.json".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}

/// Two cities where the second dominates on every indicator.
///
/// City 1 has GDP 10 000, life expectancy 70 and PM2.5 50. City 2 has GDP
/// 50 000, life expectancy 80 and PM2.5 10.
pub fn two_city_catalog() -> Catalog {
    Catalog::from_records(vec![
        CityRecord::new(CityId(1), "Ashford", "Aland", "Europe")
            .with_location(Point::new(0.0, 0.0))
            .with_indicator(Indicator::GdpPerCapita, 10_000.0)
            .with_indicator(Indicator::LifeExpectancy, 70.0)
            .with_indicator(Indicator::Pm25, 50.0),
        CityRecord::new(CityId(2), "Brightwater", "Bland", "Asia")
            .with_location(Point::new(10.0, 10.0))
            .with_indicator(Indicator::GdpPerCapita, 50_000.0)
            .with_indicator(Indicator::LifeExpectancy, 80.0)
            .with_indicator(Indicator::Pm25, 10.0),
    ])
}

/// Three cities where the third has no PM2.5 reading.
pub fn three_city_catalog_missing_pm25() -> Catalog {
    Catalog::from_records(vec![
        CityRecord::new(CityId(1), "Amberley", "Aland", "Europe")
            .with_indicator(Indicator::Pm25, 5.0),
        CityRecord::new(CityId(2), "Beacon", "Aland", "Europe")
            .with_indicator(Indicator::Pm25, 25.0),
        CityRecord::new(CityId(3), "Cinder", "Cland", "Africa"),
    ])
}
