//! Settings for the optional proximity term.

use geo::Point;

/// Default weight of the proximity term.
pub const DEFAULT_DISTANCE_WEIGHT: u32 = 5;

/// Default distance, in kilometres, at which proximity scores zero.
pub const DEFAULT_MAX_DISTANCE_KM: u32 = 2000;

/// User-facing distance settings.
///
/// The proximity term only takes part in scoring when `enabled` is set,
/// `weight` is positive and an origin is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceSettings {
    /// Whether proximity contributes to the score.
    pub enabled: bool,
    /// Weight of the proximity term alongside indicator weights.
    pub weight: u32,
    /// Distance in kilometres at or beyond which proximity scores zero.
    pub max_km: u32,
}

impl Default for DistanceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            weight: DEFAULT_DISTANCE_WEIGHT,
            max_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

impl DistanceSettings {
    /// Settings with proximity switched on and default weight and range.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Resolve the settings against a known origin.
    ///
    /// Returns `None` when the term cannot contribute: it is disabled, its
    /// weight is zero, or no origin is available.
    ///
    /// # Examples
    /// ```
    /// use geo::Point;
    /// use cityrank_core::DistanceSettings;
    ///
    /// let settings = DistanceSettings::enabled();
    /// assert!(settings.term(None).is_none());
    /// assert!(settings.term(Some(Point::new(2.35, 48.85))).is_some());
    /// ```
    pub fn term(&self, origin: Option<Point<f64>>) -> Option<DistanceTerm> {
        if !self.enabled || self.weight == 0 {
            return None;
        }
        origin.map(|origin| DistanceTerm {
            origin,
            weight: self.weight,
            max_km: self.max_km,
        })
    }
}

/// An active proximity term bound to an origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceTerm {
    /// The user's position as longitude/latitude.
    pub origin: Point<f64>,
    /// Positive weight of the term.
    pub weight: u32,
    /// Distance in kilometres at or beyond which proximity scores zero.
    pub max_km: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn disabled_term_never_resolves() {
        let settings = DistanceSettings::default();
        assert!(settings.term(Some(Point::new(0.0, 0.0))).is_none());
    }

    #[rstest]
    fn zero_weight_never_resolves() {
        let settings = DistanceSettings {
            weight: 0,
            ..DistanceSettings::enabled()
        };
        assert!(settings.term(Some(Point::new(0.0, 0.0))).is_none());
    }

    #[rstest]
    fn enabled_term_carries_settings() {
        let origin = Point::new(13.4, 52.5);
        let term = DistanceSettings::enabled()
            .term(Some(origin))
            .expect("term should resolve");
        assert_eq!(term.origin, origin);
        assert_eq!(term.weight, DEFAULT_DISTANCE_WEIGHT);
        assert_eq!(term.max_km, DEFAULT_MAX_DISTANCE_KM);
    }
}
