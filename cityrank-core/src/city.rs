//! City records and their indicator values.
//!
//! A [`CityRecord`] is immutable once loaded. Indicator values live in
//! [`IndicatorValues`], which never stores a non-finite number, so an absent
//! value and an unusable one look the same to the scorer.

use std::collections::BTreeMap;

use geo::Point;

use crate::Indicator;

/// Stable identifier of a city within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CityId(pub u64);

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw indicator values observed for one city.
///
/// Only finite values are stored; anything else reads back as absent so
/// downstream normalisation can substitute its neutral value.
///
/// # Examples
/// ```
/// use cityrank_core::{Indicator, IndicatorValues};
///
/// let values = IndicatorValues::new()
///     .with_value(Indicator::Pm25, 12.0)
///     .with_value(Indicator::HomicideRate, f64::NAN);
/// assert_eq!(values.get(Indicator::Pm25), Some(12.0));
/// assert_eq!(values.get(Indicator::HomicideRate), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorValues {
    values: BTreeMap<Indicator, f64>,
}

impl IndicatorValues {
    /// Construct an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value for `indicator`, if observed.
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values.get(&indicator).copied()
    }

    /// Record a value; non-finite input clears the entry instead.
    pub fn set(&mut self, indicator: Indicator, value: f64) {
        if value.is_finite() {
            self.values.insert(indicator, value);
        } else {
            self.values.remove(&indicator);
        }
    }

    /// Record a value while returning `self` for chaining.
    #[must_use]
    pub fn with_value(mut self, indicator: Indicator, value: f64) -> Self {
        self.set(indicator, value);
        self
    }

    /// Report whether `indicator` has a value.
    pub fn contains(&self, indicator: Indicator) -> bool {
        self.values.contains_key(&indicator)
    }

    /// Iterate over observed values in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.values.iter().map(|(indicator, value)| (*indicator, *value))
    }

    /// Number of observed indicators.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether no indicator was observed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Indicator, f64)> for IndicatorValues {
    fn from_iter<T: IntoIterator<Item = (Indicator, f64)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (indicator, value) in iter {
            values.set(indicator, value);
        }
        values
    }
}

/// One city in the catalog.
///
/// Coordinates use `geo`'s convention of `x = longitude` and
/// `y = latitude`. Records are immutable once loaded; scoring only derives
/// transient values from them.
///
/// # Examples
/// ```
/// use geo::Point;
/// use cityrank_core::{CityId, CityRecord, Indicator};
///
/// let city = CityRecord::new(CityId(1), "Lisbon", "Portugal", "Europe")
///     .with_location(Point::new(-9.14, 38.72))
///     .with_indicator(Indicator::Pm25, 8.5);
///
/// assert_eq!(city.value(Indicator::Pm25), Some(8.5));
/// assert_eq!(city.latitude(), Some(38.72));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityRecord {
    /// Unique identifier.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Country display name.
    pub country: String,
    /// Continent name.
    pub continent: String,
    /// Administrative region, when known.
    pub region: Option<String>,
    /// Resident population, when known.
    pub population: Option<u64>,
    /// Position as longitude/latitude, when known.
    pub location: Option<Point<f64>>,
    /// Observed indicator values.
    pub indicators: IndicatorValues,
}

impl CityRecord {
    /// Construct a record without location or indicator data.
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        country: impl Into<String>,
        continent: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
            continent: continent.into(),
            region: None,
            population: None,
            location: None,
            indicators: IndicatorValues::new(),
        }
    }

    /// Set the position while returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location: Point<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Record an indicator value while returning `self` for chaining.
    #[must_use]
    pub fn with_indicator(mut self, indicator: Indicator, value: f64) -> Self {
        self.indicators.set(indicator, value);
        self
    }

    /// Return the observed value for `indicator`.
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.indicators.get(indicator)
    }

    /// Latitude in degrees, when the location is known.
    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|point| point.y())
    }

    /// Longitude in degrees, when the location is known.
    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|point| point.x())
    }
}
