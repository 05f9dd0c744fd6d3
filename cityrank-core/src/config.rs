//! The complete user-controlled scoring configuration.

use std::fmt;
use std::str::FromStr;

use crate::{DistanceSettings, ProfileId, RegionFilter, WeightVector};

/// Which cities define the min/max range of each indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RangeScope {
    /// Ranges span the whole catalog; filtering never shifts scores.
    #[default]
    Catalog,
    /// Ranges span only the cities that pass the region filter.
    Filtered,
}

impl RangeScope {
    /// Return the scope as a lowercase `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Filtered => "filtered",
        }
    }
}

impl fmt::Display for RangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "filtered" => Ok(Self::Filtered),
            _ => Err(format!("unknown range scope '{s}'")),
        }
    }
}

/// Everything a user can change about a ranking.
///
/// The default starts every indicator at weight `1` and then applies the
/// default profile over it.
///
/// # Examples
/// ```
/// use cityrank_core::{Indicator, ProfileId, ScoringConfig};
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.profile, ProfileId::Living);
/// assert_eq!(config.weights.weight(Indicator::HomicideRate), 8);
/// assert_eq!(config.weights.weight(Indicator::GdpPerCapita), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    /// Active audience profile.
    pub profile: ProfileId,
    /// Weight per indicator, including carried-over entries.
    pub weights: WeightVector,
    /// Region restriction on the ranked set.
    pub filter: RegionFilter,
    /// Proximity term settings.
    pub distance: DistanceSettings,
    /// Reference population for indicator ranges.
    pub range_scope: RangeScope,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::for_profile(ProfileId::default())
    }
}

impl ScoringConfig {
    /// Start from uniform weights of `1` with `profile` applied.
    pub fn for_profile(profile: ProfileId) -> Self {
        Self {
            profile,
            weights: profile.profile().apply(&WeightVector::uniform(1)),
            filter: RegionFilter::default(),
            distance: DistanceSettings::default(),
            range_scope: RangeScope::default(),
        }
    }

    /// Switch profile, merging its presets over the current weights.
    pub fn select_profile(&mut self, profile: ProfileId) {
        self.profile = profile;
        self.weights = profile.profile().apply(&self.weights);
    }

    /// Weights restricted to the active profile's factor set.
    ///
    /// These are the weights a ranking pass actually scores with.
    pub fn effective_weights(&self) -> WeightVector {
        self.weights
            .restricted_to(&self.profile.profile().factor_set())
    }
}
