//! Score cities for a weight vector.
//!
//! The `Scorer` trait assigns a rank score to a
//! [`CityRecord`](crate::CityRecord) given the user's
//! [`WeightVector`](crate::WeightVector).

use crate::{CityRecord, WeightVector};

/// Calculate a rank score for a city.
///
/// Higher scores indicate a better match between the city and the caller's
/// priorities. Implementations must be thread-safe (`Send` + `Sync`) so
/// scorers can run across threads. The method is infallible; implementers
/// must return `0.0` when no weight applies.
///
/// Implementations must:
/// - Produce finite (`f64::is_finite`) scores.
/// - Return non-negative values.
/// - Normalise results to the range `0.0..=1.0`.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use cityrank_core::{CityId, CityRecord, Scorer, WeightVector};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(&self, _city: &CityRecord, _weights: &WeightVector) -> f64 {
///         1.0
///     }
/// }
///
/// let city = CityRecord::new(CityId(1), "Quito", "Ecuador", "South America");
/// assert_eq!(UnitScorer.score(&city, &WeightVector::new()), 1.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `city` according to `weights`.
    fn score(&self, city: &CityRecord, weights: &WeightVector) -> f64;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}

/// A city paired with the values derived for one ranking pass.
///
/// Borrowed from the catalog and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCity<'a> {
    /// The scored record.
    pub city: &'a CityRecord,
    /// Score in `0.0..=1.0`.
    pub score: f64,
    /// Great-circle distance from the origin when proximity was scored.
    pub distance_km: Option<f64>,
}
