//! Audience profiles: preset weight bundles for common use cases.
//!
//! The catalog of profiles is static configuration. Each profile names the
//! indicators it considers and a preset weight for each of them. Applying a
//! profile merges those presets over the current weights and leaves every
//! other entry untouched, so tuned weights survive a round trip through
//! another profile.

use std::fmt;
use std::str::FromStr;

use crate::{Indicator, WeightVector};

use Indicator::{
    AvgPrecipitation, AvgTemperature, CostIndex, DoctorsPer1000, GdpPerCapita, GniPerCapita,
    HomicideRate, IncomeIndex, InfantMortalityRate, InflationRate, LifeExpectancy, Pm25,
    PopulationDensity, TertiaryEducationEnrollment, UnemploymentRate,
};

/// Identifier of a built-in audience profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ProfileId {
    /// Every indicator.
    All,
    /// Residency and quality of life.
    #[default]
    Living,
    /// Economic conditions for doing business.
    Business,
    /// Short-stay travel.
    Tourism,
}

impl ProfileId {
    /// Every profile in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::Living, Self::Business, Self::Tourism];

    /// Return the profile as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::ProfileId;
    ///
    /// assert_eq!(ProfileId::Tourism.as_str(), "tourism");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Living => "living",
            Self::Business => "business",
            Self::Tourism => "tourism",
        }
    }

    /// Return the static profile definition.
    pub const fn profile(self) -> &'static AudienceProfile {
        match self {
            Self::All => &ALL_PROFILE,
            Self::Living => &LIVING_PROFILE,
            Self::Business => &BUSINESS_PROFILE,
            Self::Tourism => &TOURISM_PROFILE,
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "living" => Ok(Self::Living),
            "business" => Ok(Self::Business),
            "tourism" => Ok(Self::Tourism),
            _ => Err(format!("unknown audience profile '{s}'")),
        }
    }
}

/// A named bundle of indicators with preset weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudienceProfile {
    /// Profile identifier.
    pub id: ProfileId,
    /// Display label.
    pub label: &'static str,
    /// Indicators considered by the profile with their preset weights.
    pub presets: &'static [(Indicator, u32)],
}

impl AudienceProfile {
    /// Iterate over the indicators this profile considers.
    pub fn factors(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.presets.iter().map(|(indicator, _)| *indicator)
    }

    /// Collect the profile's factor set.
    pub fn factor_set(&self) -> Vec<Indicator> {
        self.factors().collect()
    }

    /// Report whether the profile considers `indicator`.
    pub fn considers(&self, indicator: Indicator) -> bool {
        self.factors().any(|factor| factor == indicator)
    }

    /// Return the preset weight for `indicator`, if the profile has one.
    pub fn preset(&self, indicator: Indicator) -> Option<u32> {
        self.presets
            .iter()
            .find(|(factor, _)| *factor == indicator)
            .map(|(_, weight)| *weight)
    }

    /// Merge this profile's presets over `current`.
    ///
    /// Entries for indicators outside the profile are carried over
    /// unchanged. Applying the same profile twice yields the same vector.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::{Indicator, ProfileId, WeightVector};
    ///
    /// let current = WeightVector::new().with_weight(Indicator::GdpPerCapita, 10);
    /// let merged = ProfileId::Tourism.profile().apply(&current);
    /// assert_eq!(merged.weight(Indicator::AvgTemperature), 7);
    /// assert_eq!(merged.weight(Indicator::GdpPerCapita), 10);
    /// ```
    #[must_use]
    pub fn apply(&self, current: &WeightVector) -> WeightVector {
        let mut merged = current.clone();
        for (indicator, weight) in self.presets {
            merged.set_weight(*indicator, *weight);
        }
        merged
    }
}

/// Merge `profile`'s presets over `current`.
///
/// Free-function form of [`AudienceProfile::apply`].
#[must_use]
pub fn apply_profile(current: &WeightVector, profile: &AudienceProfile) -> WeightVector {
    profile.apply(current)
}

const ALL_PROFILE: AudienceProfile = AudienceProfile {
    id: ProfileId::All,
    label: "All",
    presets: &[
        (PopulationDensity, 5),
        (Pm25, 7),
        (HomicideRate, 8),
        (LifeExpectancy, 8),
        (DoctorsPer1000, 7),
        (InfantMortalityRate, 6),
        (AvgTemperature, 5),
        (AvgPrecipitation, 4),
        (GdpPerCapita, 4),
        (GniPerCapita, 3),
        (UnemploymentRate, 6),
        (InflationRate, 5),
        (TertiaryEducationEnrollment, 6),
        (IncomeIndex, 5),
        (CostIndex, 5),
    ],
};

const LIVING_PROFILE: AudienceProfile = AudienceProfile {
    id: ProfileId::Living,
    label: "Life",
    presets: &[
        (PopulationDensity, 5),
        (Pm25, 7),
        (HomicideRate, 8),
        (LifeExpectancy, 8),
        (DoctorsPer1000, 7),
        (InfantMortalityRate, 6),
        (AvgTemperature, 5),
        (AvgPrecipitation, 4),
        (IncomeIndex, 6),
        (CostIndex, 5),
    ],
};

const BUSINESS_PROFILE: AudienceProfile = AudienceProfile {
    id: ProfileId::Business,
    label: "Business",
    presets: &[
        (GdpPerCapita, 8),
        (GniPerCapita, 7),
        (UnemploymentRate, 6),
        (InflationRate, 5),
        (PopulationDensity, 5),
        (TertiaryEducationEnrollment, 6),
        (IncomeIndex, 7),
        (CostIndex, 5),
    ],
};

const TOURISM_PROFILE: AudienceProfile = AudienceProfile {
    id: ProfileId::Tourism,
    label: "Tourism",
    presets: &[
        (AvgTemperature, 7),
        (AvgPrecipitation, 6),
        (HomicideRate, 8),
        (Pm25, 6),
        (PopulationDensity, 5),
        (IncomeIndex, 5),
        (CostIndex, 6),
    ],
};
