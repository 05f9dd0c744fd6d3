//! The loaded set of city records and the trait that produces it.
//!
//! A catalog is loaded once and never mutated afterwards. Ids are unique:
//! [`Catalog::from_records`] keeps the first record for a repeated id and
//! logs the rest.

use std::collections::HashSet;

use log::{error, warn};
use thiserror::Error;

use crate::{CityId, CityRecord};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be read.
    #[error("failed to read catalog '{name}'")]
    Read {
        /// Human-readable name of the source, usually a path.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog was read but its contents are not a catalog.
    #[error("catalog '{name}' is malformed")]
    Malformed {
        /// Human-readable name of the source, usually a path.
        name: String,
        /// Parser error describing the problem.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// An immutable collection of cities with unique ids.
///
/// # Examples
/// ```
/// use cityrank_core::{Catalog, CityId, CityRecord};
///
/// let catalog = Catalog::from_records(vec![
///     CityRecord::new(CityId(1), "Oslo", "Norway", "Europe"),
///     CityRecord::new(CityId(1), "Oslo again", "Norway", "Europe"),
/// ]);
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.cities()[0].name, "Oslo");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    cities: Vec<CityRecord>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog, dropping records whose id was already seen.
    pub fn from_records(records: impl IntoIterator<Item = CityRecord>) -> Self {
        let mut seen = HashSet::new();
        let cities = records
            .into_iter()
            .filter(|city| {
                let fresh = seen.insert(city.id);
                if !fresh {
                    warn!(
                        "duplicate city id {} for '{}'; keeping the first record",
                        city.id, city.name
                    );
                }
                fresh
            })
            .collect();
        Self { cities }
    }

    /// All cities in load order.
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Look up a city by id.
    pub fn get(&self, id: CityId) -> Option<&CityRecord> {
        self.cities.iter().find(|city| city.id == id)
    }

    /// Iterate over cities in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, CityRecord> {
        self.cities.iter()
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Report whether the catalog holds no cities.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Consume the catalog, returning its records.
    pub fn into_records(self) -> Vec<CityRecord> {
        self.cities
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CityRecord;
    type IntoIter = std::slice::Iter<'a, CityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Produces a [`Catalog`].
///
/// Implementations perform no scoring; they only retrieve records.
pub trait CatalogSource {
    /// Load the full catalog.
    fn load(&self) -> Result<Catalog, CatalogError>;

    /// Load the catalog, degrading to an empty one on failure.
    ///
    /// The failure is logged at `error` level.
    fn load_or_empty(&self) -> Catalog {
        self.load().unwrap_or_else(|err| {
            error!("catalog unavailable: {err}");
            Catalog::empty()
        })
    }
}
