//! Test helpers for writing catalogs and stubbing the origin lookup.

use super::*;
use crate::rank::LocatorBuilder;
use camino::{Utf8Path, Utf8PathBuf};
use cityrank_data::{LocateError, OriginLocator};
use cityrank_data::test_support::StubOriginLocator;
use geo::Point;
use std::cell::RefCell;
use std::time::Duration;
use tempfile::TempDir;

/// Three cities where each one beats the next on every indicator present.
pub(super) const SAMPLE_CATALOG: &str = r#"[
  {"geonameid": 3143244, "name": "Oslo", "country_name": "Norway", "continent": "Europe",
   "lat": 59.91, "lon": 10.75, "pm25": 5.0, "life_expectancy": 83.0, "homicide_rate": 0.5},
  {"geonameid": 3936456, "name": "Lima", "country_name": "Peru", "continent": "South America",
   "lat": -12.05, "lon": -77.04, "pm25": 25.0, "life_expectancy": 77.0, "homicide_rate": 7.0},
  {"geonameid": 1185241, "name": "Dhaka", "country_name": "Bangladesh", "continent": "Asia",
   "lat": 23.81, "lon": 90.41, "pm25": 80.0, "life_expectancy": 72.0, "homicide_rate": 9.0}
]
"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

/// A temporary directory holding `catalog.json`.
pub(super) struct CatalogDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl CatalogDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn with_sample() -> Self {
        let dir = Self::new();
        dir.write_catalog(SAMPLE_CATALOG);
        dir
    }

    pub(super) fn catalog(&self) -> Utf8PathBuf {
        self.root.join("catalog.json")
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write_catalog(&self, contents: &str) {
        write_utf8(&self.catalog(), contents.as_bytes());
    }
}

impl std::fmt::Debug for CatalogDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDir").field("root", &self.root).finish()
    }
}

/// Hands out a stub locator and remembers the URLs it was asked for.
#[derive(Debug, Default)]
pub(super) struct StubLocatorBuilder {
    origin: Option<Point<f64>>,
    requested: RefCell<Vec<String>>,
}

impl StubLocatorBuilder {
    pub(super) fn answering(origin: Point<f64>) -> Self {
        Self {
            origin: Some(origin),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl LocatorBuilder for StubLocatorBuilder {
    fn build(&self, url: &str, _timeout: Duration) -> Result<Box<dyn OriginLocator>, CliError> {
        self.requested.borrow_mut().push(url.to_owned());
        let locator = match self.origin {
            Some(origin) => StubOriginLocator::with_origin(origin),
            None => StubOriginLocator::with_error(LocateError::Parse {
                message: "lookup refused".to_owned(),
            }),
        };
        Ok(Box::new(locator))
    }
}

pub(super) fn stdout_text(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("stdout utf-8")
}
