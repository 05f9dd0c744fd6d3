//! Shareable configuration encoding against realistic query strings.

use cityrank_core::{Indicator, ProfileId, RangeScope, RegionFilter, ScoringConfig, share};
use rstest::{fixture, rstest};

#[fixture]
fn defaults() -> ScoringConfig {
    ScoringConfig::default()
}

#[fixture]
fn tuned() -> ScoringConfig {
    let mut config = ScoringConfig::for_profile(ProfileId::Business);
    config.weights.set_weight(Indicator::Pm25, 0);
    config.weights.set_weight(Indicator::GdpPerCapita, 42);
    config.filter = RegionFilter::new()
        .with_country("Côte d'Ivoire")
        .with_country("Bosnia & Herzegovina")
        .with_continent("Africa");
    config.distance.enabled = true;
    config.distance.weight = 3;
    config.distance.max_km = 750;
    config.range_scope = RangeScope::Filtered;
    config
}

#[rstest]
fn tuned_configuration_survives_sharing(tuned: ScoringConfig, defaults: ScoringConfig) {
    let query = share::encode(&tuned);
    assert_eq!(share::decode(&query, &defaults), tuned);
}

#[rstest]
fn special_characters_are_escaped(tuned: ScoringConfig) {
    let query = share::encode(&tuned);
    assert!(query.contains("country=Bosnia+%26+Herzegovina"));
    assert!(!query.contains("& "));
}

#[rstest]
fn empty_query_keeps_defaults(defaults: ScoringConfig) {
    assert_eq!(share::decode("", &defaults), defaults);
}

#[rstest]
#[case("w=1,2,3&profile=tourism")]
#[case("w=a,b,c,d,e,f,g,h,i,j,k,l,m,n,o&profile=tourism")]
fn bad_weights_do_not_block_other_keys(defaults: ScoringConfig, #[case] query: &str) {
    let decoded = share::decode(query, &defaults);
    assert_eq!(decoded.profile, ProfileId::Tourism);
    assert_eq!(
        decoded.weights,
        ProfileId::Tourism.profile().apply(&defaults.weights)
    );
}

#[rstest]
fn shared_profile_scores_like_a_fresh_selection(defaults: ScoringConfig) {
    let decoded = share::decode("profile=tourism", &defaults);
    assert_eq!(
        decoded.effective_weights(),
        ScoringConfig::for_profile(ProfileId::Tourism).effective_weights()
    );
}

#[rstest]
#[case("dist=maybe", false)]
#[case("dist=1", true)]
#[case("dist=0", false)]
fn distance_toggle(defaults: ScoringConfig, #[case] query: &str, #[case] enabled: bool) {
    assert_eq!(share::decode(query, &defaults).distance.enabled, enabled);
}

#[rstest]
#[case("dw=-4")]
#[case("dmax=far")]
#[case("scope=everywhere")]
#[case("profile=students")]
#[case("unknown=1")]
fn malformed_flags_are_ignored(defaults: ScoringConfig, #[case] query: &str) {
    assert_eq!(share::decode(query, &defaults), defaults);
}

#[rstest]
fn repeated_filters_accumulate(defaults: ScoringConfig) {
    let decoded = share::decode("country=Japan&country=Chile&continent=Asia", &defaults);
    assert_eq!(decoded.filter.countries.len(), 2);
    assert!(decoded.filter.continents.contains("Asia"));
}
