//! Ordering scored cities.

use std::cmp::Ordering;

use cityrank_core::{CityRecord, DistanceTerm, RankedCity, WeightVector};

use crate::normalise::RangeTable;
use crate::score::WeightedScorer;

/// Score every city and sort by descending score.
///
/// The sort is stable: cities with equal scores keep their input order.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord, WeightVector};
/// use cityrank_scorer::{RangeTable, rank};
///
/// let cities = [
///     CityRecord::new(CityId(1), "A", "X", "Y"),
///     CityRecord::new(CityId(2), "B", "X", "Y"),
/// ];
/// let ranked = rank(&cities, &WeightVector::new(), &RangeTable::default(), None);
/// let ids: Vec<_> = ranked.iter().map(|r| r.city.id.0).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub fn rank<'a>(
    cities: impl IntoIterator<Item = &'a CityRecord>,
    weights: &WeightVector,
    ranges: &RangeTable,
    distance: Option<&DistanceTerm>,
) -> Vec<RankedCity<'a>> {
    let scorer = WeightedScorer::new(ranges, distance.copied());
    let mut ranked: Vec<_> = cities
        .into_iter()
        .map(|city| scorer.rank_entry(city, weights))
        .collect();
    ranked.sort_by(by_descending_score);
    ranked
}

/// Total order placing higher scores first.
#[must_use]
pub fn by_descending_score(a: &RankedCity<'_>, b: &RankedCity<'_>) -> Ordering {
    b.score.total_cmp(&a.score)
}
