//! Property-based tests for normalisation and ranking.
//!
//! # Invariants tested
//!
//! - **Bounded output:** `normalize` always returns a value in `0.0..=1.0`.
//! - **Idempotence:** normalising the same input twice gives the same value.
//! - **Constant columns:** equal values normalise to the neutral midpoint.
//! - **Zero weights:** a zero weight behaves exactly like a missing entry.
//! - **Determinism:** ranking identical inputs gives identical order.
//! - **Stability:** tied scores keep their input order.
//! - **Cut-off:** proximity is exactly `0.0` at or beyond the cut-off and
//!   positive inside it.

use cityrank_core::{Catalog, CityId, CityRecord, Indicator, Polarity, WeightVector};
use cityrank_scorer::{
    IndicatorRange, NEUTRAL, RangeTable, compute_range, normalize, proximity, rank,
};
use proptest::prelude::*;

fn polarity_strategy() -> impl Strategy<Value = Polarity> {
    prop_oneof![Just(Polarity::HigherIsBetter), Just(Polarity::LowerIsBetter)]
}

fn value_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (-1.0e9_f64..1.0e9).prop_map(Some),
        1 => Just(None),
        1 => Just(Some(f64::NAN)),
        1 => Just(Some(f64::INFINITY)),
    ]
}

fn range_strategy() -> impl Strategy<Value = IndicatorRange> {
    (-1.0e9_f64..1.0e9, -1.0e9_f64..1.0e9)
        .prop_map(|(a, b)| IndicatorRange::from_bounds(a.min(b), a.max(b)))
}

/// Build a catalog whose cities carry `values` for the first three indicators.
fn catalog_from(values: &[[Option<f64>; 3]]) -> Catalog {
    let indicators = [
        Indicator::GdpPerCapita,
        Indicator::Pm25,
        Indicator::LifeExpectancy,
    ];
    Catalog::from_records(values.iter().zip(1_u64..).map(|(row, id)| {
        let mut city = CityRecord::new(CityId(id), format!("City {id}"), "Country", "Continent");
        for (indicator, value) in indicators.iter().zip(row) {
            if let Some(value) = value {
                city.indicators.set(*indicator, *value);
            }
        }
        city
    }))
}

fn row_strategy() -> impl Strategy<Value = [Option<f64>; 3]> {
    [
        proptest::option::of(0.0_f64..100.0),
        proptest::option::of(0.0_f64..100.0),
        proptest::option::of(0.0_f64..100.0),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: normalised values stay within the unit interval.
    #[test]
    fn normalize_is_bounded(
        value in value_strategy(),
        range in range_strategy(),
        polarity in polarity_strategy(),
    ) {
        let normalised = normalize(value, range, polarity);
        prop_assert!((0.0..=1.0).contains(&normalised), "got {normalised}");
    }

    /// Property: normalisation is pure.
    #[test]
    fn normalize_is_idempotent(
        value in value_strategy(),
        range in range_strategy(),
        polarity in polarity_strategy(),
    ) {
        let first = normalize(value, range, polarity);
        let second = normalize(value, range, polarity);
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    /// Property: a constant column normalises to the neutral midpoint.
    #[test]
    fn constant_values_are_neutral(
        constant in -1.0e12_f64..1.0e12,
        count in 1_usize..20,
        polarity in polarity_strategy(),
    ) {
        let rows = vec![[Some(constant), None, None]; count];
        let catalog = catalog_from(&rows);
        let range = compute_range(&catalog, Indicator::GdpPerCapita);
        prop_assert!(range.is_degenerate());
        prop_assert_eq!(normalize(Some(constant), range, polarity), NEUTRAL);
    }

    /// Property: a zero weight is equivalent to removing the entry.
    #[test]
    fn zero_weight_matches_removed_key(
        rows in proptest::collection::vec(row_strategy(), 1..12),
        gdp in 0_u32..10,
        pm25 in 0_u32..10,
    ) {
        let catalog = catalog_from(&rows);
        let with_zero = WeightVector::new()
            .with_weight(Indicator::GdpPerCapita, gdp)
            .with_weight(Indicator::Pm25, pm25)
            .with_weight(Indicator::LifeExpectancy, 0);
        let without = WeightVector::new()
            .with_weight(Indicator::GdpPerCapita, gdp)
            .with_weight(Indicator::Pm25, pm25);
        let ranges = RangeTable::compute(
            catalog.iter(),
            [Indicator::GdpPerCapita, Indicator::Pm25, Indicator::LifeExpectancy],
        );
        let a: Vec<_> = rank(&catalog, &with_zero, &ranges, None)
            .iter()
            .map(|r| (r.city.id, r.score.to_bits()))
            .collect();
        let b: Vec<_> = rank(&catalog, &without, &ranges, None)
            .iter()
            .map(|r| (r.city.id, r.score.to_bits()))
            .collect();
        prop_assert_eq!(a, b);
    }

    /// Property: ranking is deterministic and ties keep input order.
    #[test]
    fn ranking_is_deterministic_and_stable(
        rows in proptest::collection::vec(row_strategy(), 1..16),
        weight in 0_u32..5,
    ) {
        let catalog = catalog_from(&rows);
        let weights = WeightVector::new().with_weight(Indicator::GdpPerCapita, weight);
        let ranges = RangeTable::compute(catalog.iter(), [Indicator::GdpPerCapita]);
        let first = rank(&catalog, &weights, &ranges, None);
        let second = rank(&catalog, &weights, &ranges, None);
        let ids = |ranked: &[cityrank_core::RankedCity<'_>]| {
            ranked.iter().map(|r| r.city.id).collect::<Vec<_>>()
        };
        prop_assert_eq!(ids(first.as_slice()), ids(second.as_slice()));
        for pair in first.windows(2) {
            if let [a, b] = pair {
                prop_assert!(a.score >= b.score);
                if a.score.to_bits() == b.score.to_bits() {
                    prop_assert!(a.city.id < b.city.id, "tie broke input order");
                }
            }
        }
    }

    /// Property: distances at or beyond the cut-off contribute nothing.
    #[test]
    fn proximity_is_zero_beyond_the_cut_off(
        max_km in 1_u32..20_000,
        beyond in 0_u32..1_000_000,
    ) {
        let distance = f64::from(max_km.saturating_add(beyond));
        prop_assert_eq!(proximity(distance, max_km), 0.0);
    }

    /// Property: distances inside the cut-off score in `(0.0, 1.0]`.
    #[test]
    fn proximity_is_positive_inside_the_cut_off(
        (max_km, distance) in (1_u32..20_000).prop_flat_map(|max| (Just(max), 0..max)),
    ) {
        let score = proximity(f64::from(distance), max_km);
        prop_assert!(score > 0.0 && score <= 1.0, "got {score}");
    }
}
