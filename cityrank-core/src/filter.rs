//! Country and continent filters restricting which cities are ranked.

use std::collections::BTreeSet;

use crate::CityRecord;

/// Restricts the ranked set to cities in selected countries and continents.
///
/// An empty set on either axis matches every city. When both axes are
/// populated a city must match both.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord, RegionFilter};
///
/// let filter = RegionFilter::new().with_continent("Europe");
/// let paris = CityRecord::new(CityId(1), "Paris", "France", "Europe");
/// let lima = CityRecord::new(CityId(2), "Lima", "Peru", "South America");
/// assert!(filter.matches(&paris));
/// assert!(!filter.matches(&lima));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionFilter {
    /// Accepted country names; empty accepts all.
    pub countries: BTreeSet<String>,
    /// Accepted continent names; empty accepts all.
    pub continents: BTreeSet<String>,
}

impl RegionFilter {
    /// Construct a filter that matches every city.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `country` while returning `self` for chaining.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.insert(country.into());
        self
    }

    /// Accept `continent` while returning `self` for chaining.
    #[must_use]
    pub fn with_continent(mut self, continent: impl Into<String>) -> Self {
        self.continents.insert(continent.into());
        self
    }

    /// Report whether the filter accepts every city.
    pub fn is_unrestricted(&self) -> bool {
        self.countries.is_empty() && self.continents.is_empty()
    }

    /// Report whether `city` passes the filter.
    pub fn matches(&self, city: &CityRecord) -> bool {
        let country_ok = self.countries.is_empty() || self.countries.contains(&city.country);
        let continent_ok =
            self.continents.is_empty() || self.continents.contains(&city.continent);
        country_ok && continent_ok
    }
}
