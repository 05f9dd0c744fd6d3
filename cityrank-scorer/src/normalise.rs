//! Min–max normalisation of raw indicator values.
//!
//! Ranges are computed over a reference population of cities and map each
//! raw value onto `0.0..=1.0`. Missing data never fails: absent values and
//! degenerate ranges both yield [`NEUTRAL`].

use std::collections::BTreeMap;

use cityrank_core::{CityRecord, Indicator, Polarity};
use log::warn;

/// Normalised value used when nothing distinguishes one city from another.
pub const NEUTRAL: f64 = 0.5;

/// Observed spread of one indicator across a reference population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorRange {
    /// No finite value was observed, or every observed value was equal.
    Degenerate,
    /// Finite bounds with `min < max`.
    Span {
        /// Smallest observed value.
        min: f64,
        /// Largest observed value.
        max: f64,
    },
}

impl IndicatorRange {
    /// Build a range from observed bounds, collapsing equal or invalid ones.
    #[must_use]
    pub fn from_bounds(min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() && min < max {
            Self::Span { min, max }
        } else {
            Self::Degenerate
        }
    }

    /// Report whether every city normalises to [`NEUTRAL`].
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

/// Scan `cities` for the finite values of `indicator` and return their range.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord, Indicator};
/// use cityrank_scorer::{IndicatorRange, compute_range};
///
/// let cities = [
///     CityRecord::new(CityId(1), "A", "X", "Y").with_indicator(Indicator::Pm25, 4.0),
///     CityRecord::new(CityId(2), "B", "X", "Y").with_indicator(Indicator::Pm25, 9.0),
///     CityRecord::new(CityId(3), "C", "X", "Y"),
/// ];
/// assert_eq!(
///     compute_range(&cities, Indicator::Pm25),
///     IndicatorRange::Span { min: 4.0, max: 9.0 }
/// );
/// ```
pub fn compute_range<'a>(
    cities: impl IntoIterator<Item = &'a CityRecord>,
    indicator: Indicator,
) -> IndicatorRange {
    let bounds = cities
        .into_iter()
        .filter_map(|city| city.value(indicator))
        .filter(|value| value.is_finite())
        .fold(None, |bounds: Option<(f64, f64)>, value| match bounds {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        });
    let range = bounds.map_or(IndicatorRange::Degenerate, |(min, max)| {
        IndicatorRange::from_bounds(min, max)
    });
    if range.is_degenerate() {
        warn!("indicator {indicator} has a degenerate range; every city scores neutral on it");
    }
    range
}

/// Map `value` onto `0.0..=1.0` within `range`, honouring `polarity`.
///
/// Absent or non-finite values and degenerate ranges yield [`NEUTRAL`].
/// Values outside the range are clipped.
///
/// # Examples
/// ```
/// use cityrank_core::Polarity;
/// use cityrank_scorer::{IndicatorRange, NEUTRAL, normalize};
///
/// let range = IndicatorRange::Span { min: 10.0, max: 50.0 };
/// assert_eq!(normalize(Some(50.0), range, Polarity::HigherIsBetter), 1.0);
/// assert_eq!(normalize(Some(50.0), range, Polarity::LowerIsBetter), 0.0);
/// assert_eq!(normalize(None, range, Polarity::HigherIsBetter), NEUTRAL);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "min-max normalisation divides by the observed span"
)]
pub fn normalize(value: Option<f64>, range: IndicatorRange, polarity: Polarity) -> f64 {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return NEUTRAL;
    };
    let IndicatorRange::Span { min, max } = range else {
        return NEUTRAL;
    };
    let position = ((value - min) / (max - min)).clamp(0.0, 1.0);
    match polarity {
        Polarity::HigherIsBetter => position,
        Polarity::LowerIsBetter => 1.0 - position,
    }
}

/// Ranges for a set of indicators over one reference population.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeTable {
    ranges: BTreeMap<Indicator, IndicatorRange>,
}

impl RangeTable {
    /// A table with no computed ranges.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    /// Compute a range for each of `indicators` over `cities`.
    pub fn compute<'a, C>(cities: C, indicators: impl IntoIterator<Item = Indicator>) -> Self
    where
        C: IntoIterator<Item = &'a CityRecord>,
        C::IntoIter: Clone,
    {
        let cities = cities.into_iter();
        let ranges = indicators
            .into_iter()
            .map(|indicator| (indicator, compute_range(cities.clone(), indicator)))
            .collect();
        Self { ranges }
    }

    /// Return the range for `indicator`, if one was computed.
    #[must_use]
    pub fn get(&self, indicator: Indicator) -> Option<IndicatorRange> {
        self.ranges.get(&indicator).copied()
    }

    /// Report whether a range was computed for `indicator`.
    #[must_use]
    pub fn contains(&self, indicator: Indicator) -> bool {
        self.ranges.contains_key(&indicator)
    }

    /// Normalise `city`'s value for `indicator`.
    ///
    /// Returns `None` when no range was computed for the indicator.
    #[must_use]
    pub fn normalise(&self, city: &CityRecord, indicator: Indicator) -> Option<f64> {
        self.get(indicator)
            .map(|range| normalize(city.value(indicator), range, indicator.polarity()))
    }

    /// Iterate over the computed ranges in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, IndicatorRange)> + '_ {
        self.ranges.iter().map(|(indicator, range)| (*indicator, *range))
    }

    /// Number of indicators with a computed range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Report whether no range was computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromIterator<(Indicator, IndicatorRange)> for RangeTable {
    fn from_iter<T: IntoIterator<Item = (Indicator, IndicatorRange)>>(iter: T) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}
