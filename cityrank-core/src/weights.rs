//! User-chosen importance weights per indicator.
//!
//! Weights are non-negative integer magnitudes. A weight of `0` means the
//! indicator is ignored entirely and never reaches the denominator of the
//! weighted average.

use std::collections::BTreeMap;

use crate::Indicator;

/// Mapping from indicator to weight magnitude.
///
/// # Examples
/// ```
/// use cityrank_core::{Indicator, WeightVector};
///
/// let weights = WeightVector::new()
///     .with_weight(Indicator::Pm25, 7)
///     .with_weight(Indicator::CostIndex, 0);
/// assert_eq!(weights.weight(Indicator::Pm25), 7);
/// assert_eq!(weights.active().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightVector {
    weights: BTreeMap<Indicator, u32>,
}

impl WeightVector {
    /// Construct an empty weight vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the same weight to every indicator in the registry.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::{Indicator, WeightVector};
    ///
    /// let weights = WeightVector::uniform(1);
    /// assert!(Indicator::ALL.iter().all(|i| weights.weight(*i) == 1));
    /// ```
    pub fn uniform(weight: u32) -> Self {
        Indicator::ALL
            .iter()
            .map(|indicator| (*indicator, weight))
            .collect()
    }

    /// Return the weight for `indicator`, or `0` when unset.
    pub fn weight(&self, indicator: Indicator) -> u32 {
        self.weights.get(&indicator).copied().unwrap_or(0)
    }

    /// Return the stored entry for `indicator`, distinguishing unset from zero.
    pub fn get(&self, indicator: Indicator) -> Option<u32> {
        self.weights.get(&indicator).copied()
    }

    /// Insert or update a weight.
    pub fn set_weight(&mut self, indicator: Indicator, weight: u32) {
        self.weights.insert(indicator, weight);
    }

    /// Insert or update a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, indicator: Indicator, weight: u32) -> Self {
        self.set_weight(indicator, weight);
        self
    }

    /// Remove an entry, returning its previous weight.
    pub fn remove(&mut self, indicator: Indicator) -> Option<u32> {
        self.weights.remove(&indicator)
    }

    /// Iterate over every stored entry, including zero weights.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, u32)> + '_ {
        self.weights
            .iter()
            .map(|(indicator, weight)| (*indicator, *weight))
    }

    /// Iterate over entries with a strictly positive weight.
    pub fn active(&self) -> impl Iterator<Item = (Indicator, u32)> + '_ {
        self.iter().filter(|(_, weight)| *weight > 0)
    }

    /// Keep only the entries whose indicator appears in `indicators`.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::{Indicator, WeightVector};
    ///
    /// let weights = WeightVector::uniform(2).restricted_to(&[Indicator::Pm25]);
    /// assert_eq!(weights.iter().count(), 1);
    /// ```
    #[must_use]
    pub fn restricted_to(&self, indicators: &[Indicator]) -> Self {
        self.iter()
            .filter(|(indicator, _)| indicators.contains(indicator))
            .collect()
    }

    /// Return the weights as a dense list in [`Indicator::ALL`] order.
    pub fn to_ordered(&self) -> [u32; Indicator::COUNT] {
        Indicator::ALL.map(|indicator| self.weight(indicator))
    }

    /// Build a vector from a dense list in [`Indicator::ALL`] order.
    pub fn from_ordered(weights: [u32; Indicator::COUNT]) -> Self {
        Indicator::ALL.into_iter().zip(weights).collect()
    }

    /// Report whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl FromIterator<(Indicator, u32)> for WeightVector {
    fn from_iter<T: IntoIterator<Item = (Indicator, u32)>>(iter: T) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}
