//! Unit coverage for normalisation, distance and session helpers.
#![forbid(unsafe_code)]

use cityrank_core::test_support::{three_city_catalog_missing_pm25, two_city_catalog};
use cityrank_core::{
    CityId, CityRecord, DistanceSettings, Indicator, Polarity, ProfileId, RangeScope,
    RegionFilter, ScoringConfig, WeightVector,
};
use geo::Point;
use rstest::{fixture, rstest};

use crate::{
    IndicatorRange, NEUTRAL, RangeTable, RankingSession, compute_range, compute_score,
    haversine_km, normalize, proximity, rank,
};

#[fixture]
fn span() -> IndicatorRange {
    IndicatorRange::Span {
        min: 10.0,
        max: 50.0,
    }
}

#[rstest]
#[case(Some(30.0), Polarity::HigherIsBetter, 0.5)]
#[case(Some(10.0), Polarity::HigherIsBetter, 0.0)]
#[case(Some(10.0), Polarity::LowerIsBetter, 1.0)]
#[case(Some(90.0), Polarity::HigherIsBetter, 1.0)]
#[case(Some(-90.0), Polarity::LowerIsBetter, 1.0)]
#[case(None, Polarity::LowerIsBetter, NEUTRAL)]
#[case(Some(f64::NAN), Polarity::HigherIsBetter, NEUTRAL)]
#[case(Some(f64::NEG_INFINITY), Polarity::HigherIsBetter, NEUTRAL)]
fn normalises_within_span(
    span: IndicatorRange,
    #[case] value: Option<f64>,
    #[case] polarity: Polarity,
    #[case] expected: f64,
) {
    assert_eq!(normalize(value, span, polarity), expected);
}

#[rstest]
fn degenerate_range_is_neutral() {
    assert_eq!(
        normalize(Some(3.0), IndicatorRange::Degenerate, Polarity::HigherIsBetter),
        NEUTRAL
    );
}

#[rstest]
#[case(5.0, 5.0)]
#[case(f64::NAN, 1.0)]
#[case(2.0, 1.0)]
fn bounds_collapse_when_not_increasing(#[case] min: f64, #[case] max: f64) {
    assert!(IndicatorRange::from_bounds(min, max).is_degenerate());
}

#[rstest]
fn range_ignores_missing_values() {
    let catalog = three_city_catalog_missing_pm25();
    assert_eq!(
        compute_range(&catalog, Indicator::Pm25),
        IndicatorRange::Span { min: 5.0, max: 25.0 }
    );
    assert!(compute_range(&catalog, Indicator::LifeExpectancy).is_degenerate());
}

#[rstest]
fn identical_points_are_zero_km_apart() {
    let lisbon = Point::new(-9.14, 38.72);
    assert_eq!(haversine_km(lisbon, lisbon), 0.0);
}

#[rstest]
#[expect(
    clippy::float_arithmetic,
    reason = "test compares against half the Earth's circumference"
)]
fn antipodal_points_are_half_a_circumference_apart() {
    let d = haversine_km(Point::new(0.0, 0.0), Point::new(180.0, 0.0));
    assert!(d.is_finite());
    assert!((d - std::f64::consts::PI * 6371.0).abs() < 1e-6);
}

#[rstest]
#[case(2000.0, 2000, 0.0)]
#[case(2500.0, 2000, 0.0)]
#[case(500.0, 2000, 0.75)]
#[case(10.0, 0, 0.0)]
#[case(f64::NAN, 2000, 0.0)]
fn proximity_falls_off_linearly(#[case] km: f64, #[case] max_km: u32, #[case] expected: f64) {
    assert_eq!(proximity(km, max_km), expected);
}

#[rstest]
fn all_zero_weights_score_zero() {
    let catalog = two_city_catalog();
    let indicators = [Indicator::GdpPerCapita, Indicator::Pm25];
    let ranges = RangeTable::compute(catalog.iter(), indicators);
    let weights: WeightVector = indicators.into_iter().map(|i| (i, 0)).collect();
    let ranked = rank(&catalog, &weights, &ranges, None);
    let ids: Vec<_> = ranked.iter().map(|r| r.city.id).collect();
    assert_eq!(ids, vec![CityId(1), CityId(2)]);
    assert!(ranked.iter().all(|r| r.score == 0.0));
}

#[rstest]
fn city_without_location_takes_neutral_proximity() {
    let city = CityRecord::new(CityId(9), "Drift", "Sea", "Ocean");
    let term = DistanceSettings::enabled()
        .term(Some(Point::new(0.0, 0.0)))
        .expect("enabled term with origin");
    let ranges = RangeTable::default();
    let score = compute_score(&city, &WeightVector::new(), &ranges, Some(&term));
    assert_eq!(score, NEUTRAL);
}

#[rstest]
fn weights_without_ranges_are_skipped() {
    let city = CityRecord::new(CityId(1), "A", "X", "Y").with_indicator(Indicator::Pm25, 1.0);
    let weights = WeightVector::new().with_weight(Indicator::Pm25, 4);
    assert_eq!(compute_score(&city, &weights, &RangeTable::default(), None), 0.0);
}

#[rstest]
fn stale_origin_results_are_discarded() {
    let mut session = RankingSession::new(two_city_catalog(), ScoringConfig::default());
    let first = session.request_origin();
    let second = session.request_origin();
    assert!(!session.resolve_origin(first, Some(Point::new(1.0, 1.0))));
    assert!(session.origin().is_none());
    assert!(session.resolve_origin(second, Some(Point::new(2.0, 2.0))));
    assert_eq!(session.origin(), Some(Point::new(2.0, 2.0)));
}

#[rstest]
fn origin_arriving_after_disable_is_discarded() {
    let mut session = RankingSession::new(two_city_catalog(), ScoringConfig::default());
    let request = session.request_origin();
    session.disable_distance();
    assert!(!session.resolve_origin(request, Some(Point::new(1.0, 1.0))));
    assert!(!session.distance_active());
}

#[rstest]
fn failed_origin_lookup_leaves_distance_inactive() {
    let mut session = RankingSession::new(two_city_catalog(), ScoringConfig::default());
    let request = session.request_origin();
    assert!(session.resolve_origin(request, None));
    assert!(!session.distance_active());
}

#[rstest]
fn filtered_scope_recomputes_ranges_from_the_subset() {
    let mut session = RankingSession::new(
        three_city_catalog_missing_pm25(),
        ScoringConfig::for_profile(ProfileId::Living),
    );
    session.set_filter(RegionFilter::new().with_continent("Europe"));
    let catalog_range = session.ranges().get(Indicator::Pm25);
    session.set_range_scope(RangeScope::Filtered);
    let filtered_range = session.ranges().get(Indicator::Pm25);
    assert_eq!(catalog_range, filtered_range);

    session.set_filter(RegionFilter::new().with_country("Cland"));
    assert_eq!(
        session.ranges().get(Indicator::Pm25),
        Some(IndicatorRange::Degenerate)
    );
    session.set_range_scope(RangeScope::Catalog);
    assert_eq!(
        session.ranges().get(Indicator::Pm25),
        Some(IndicatorRange::Span { min: 5.0, max: 25.0 })
    );
}
