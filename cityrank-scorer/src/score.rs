//! Weighted aggregation of normalised indicators into a single score.

use cityrank_core::{CityRecord, DistanceTerm, RankedCity, Scorer, WeightVector};

use crate::distance::{haversine_km, proximity};
use crate::normalise::{NEUTRAL, RangeTable};

/// Multiplier applied to the weighted average.
///
/// Scores are reported on `0.0..=1.0`.
pub const SCORE_SCALE: f64 = 1.0;

/// Score `city` as the weighted average of its normalised indicators.
///
/// Only indicators with a positive weight and a computed range take part.
/// When `distance` is supplied it contributes one more term, its proximity
/// weighted by [`DistanceTerm::weight`]; a city without a location takes
/// [`NEUTRAL`] for that term. With no contributing term the score is `0.0`.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord, Indicator, WeightVector};
/// use cityrank_scorer::{IndicatorRange, RangeTable, compute_score};
///
/// let ranges: RangeTable = [(Indicator::LifeExpectancy, IndicatorRange::Span { min: 70.0, max: 80.0 })]
///     .into_iter()
///     .collect();
/// let city = CityRecord::new(CityId(1), "A", "X", "Y")
///     .with_indicator(Indicator::LifeExpectancy, 75.0);
/// let weights = WeightVector::new().with_weight(Indicator::LifeExpectancy, 3);
/// assert_eq!(compute_score(&city, &weights, &ranges, None), 0.5);
/// ```
#[must_use]
pub fn compute_score(
    city: &CityRecord,
    weights: &WeightVector,
    ranges: &RangeTable,
    distance: Option<&DistanceTerm>,
) -> f64 {
    score_city(city, weights, ranges, distance).score
}

/// Score `city` and keep the distance derived along the way.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "weighted averages require floating-point accumulation"
)]
pub fn score_city<'a>(
    city: &'a CityRecord,
    weights: &WeightVector,
    ranges: &RangeTable,
    distance: Option<&DistanceTerm>,
) -> RankedCity<'a> {
    let mut sum = 0.0_f64;
    let mut total = 0.0_f64;
    for (indicator, weight) in weights.active() {
        if let Some(value) = ranges.normalise(city, indicator) {
            let weight = f64::from(weight);
            sum += value * weight;
            total += weight;
        }
    }

    let mut distance_km = None;
    if let Some(term) = distance.filter(|term| term.weight > 0) {
        let contribution = city.location.map_or(NEUTRAL, |location| {
            let km = haversine_km(term.origin, location);
            distance_km = Some(km);
            proximity(km, term.max_km)
        });
        let weight = f64::from(term.weight);
        sum += contribution * weight;
        total += weight;
    }

    let score = if total > 0.0 {
        sum / total * SCORE_SCALE
    } else {
        0.0
    };
    RankedCity {
        city,
        score: WeightedScorer::sanitise(score),
        distance_km,
    }
}

/// [`Scorer`] backed by precomputed ranges and an optional proximity term.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord, Scorer, WeightVector};
/// use cityrank_scorer::{RangeTable, WeightedScorer};
///
/// let ranges = RangeTable::default();
/// let scorer = WeightedScorer::new(&ranges, None);
/// let city = CityRecord::new(CityId(1), "A", "X", "Y");
/// assert_eq!(scorer.score(&city, &WeightVector::uniform(1)), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WeightedScorer<'r> {
    ranges: &'r RangeTable,
    distance: Option<DistanceTerm>,
}

impl<'r> WeightedScorer<'r> {
    /// Bind a scorer to `ranges` and an optional proximity term.
    #[must_use]
    pub const fn new(ranges: &'r RangeTable, distance: Option<DistanceTerm>) -> Self {
        Self { ranges, distance }
    }

    /// Score `city`, keeping the derived distance.
    #[must_use]
    pub fn rank_entry<'a>(&self, city: &'a CityRecord, weights: &WeightVector) -> RankedCity<'a> {
        score_city(city, weights, self.ranges, self.distance.as_ref())
    }
}

impl Scorer for WeightedScorer<'_> {
    fn score(&self, city: &CityRecord, weights: &WeightVector) -> f64 {
        compute_score(city, weights, self.ranges, self.distance.as_ref())
    }
}
