//! Focused unit tests covering rank configuration and output.

use super::helpers::{CatalogDir, StubLocatorBuilder, stdout_text};
use super::*;
use crate::rank::{OriginChoice, OutputFormat, RankArgs, RankConfig, execute_rank, run_rank_with};
use cityrank_core::{Catalog, CatalogSource, ProfileId, ScoringConfig, share};
use cityrank_data::{DEFAULT_LOCATE_TIMEOUT, DEFAULT_LOCATE_URL, JsonCatalogSource};
use geo::Point;
use rstest::rstest;
use std::time::Duration;

fn rank_args(catalog: &CatalogDir) -> RankArgs {
    RankArgs {
        catalog: Some(catalog.catalog()),
        ..RankArgs::default()
    }
}

fn ranked_names(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(2).map(str::to_owned))
        .collect()
}

#[rstest]
fn converting_rank_without_catalog_errors() {
    let err = RankConfig::try_from(RankArgs::default()).expect_err("missing catalog should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(env, ENV_RANK_CATALOG);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn rank_config_defaults_to_the_living_profile_without_distance() {
    let dir = CatalogDir::new();
    let config = RankConfig::try_from(rank_args(&dir)).expect("config should build");
    assert_eq!(config.scoring, ScoringConfig::default());
    assert_eq!(config.origin, OriginChoice::Unset);
    assert_eq!(config.format, OutputFormat::Table);
    assert_eq!(config.limit, None);
}

#[rstest]
fn fixed_origin_enables_distance() {
    let dir = CatalogDir::new();
    let args = RankArgs {
        origin: Some("-12.0,-77.0".to_owned()),
        ..rank_args(&dir)
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(config.origin, OriginChoice::Fixed(Point::new(-77.0, -12.0)));
    assert!(config.scoring.distance.enabled);
}

#[rstest]
fn locate_uses_the_default_service() {
    let dir = CatalogDir::new();
    let args = RankArgs {
        locate: true,
        ..rank_args(&dir)
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.origin,
        OriginChoice::Locate {
            url: DEFAULT_LOCATE_URL.to_owned(),
            timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    );
}

#[rstest]
fn shared_distance_is_dropped_without_an_origin() {
    let dir = CatalogDir::new();
    let mut shared = ScoringConfig::for_profile(ProfileId::Tourism);
    shared.distance.enabled = true;
    let args = RankArgs {
        share: Some(share::encode(&shared)),
        ..rank_args(&dir)
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(config.scoring.profile, ProfileId::Tourism);
    assert!(!config.scoring.distance.enabled);
}

#[rstest]
#[case::format(RankArgs { format: Some("xml".to_owned()), ..RankArgs::default() }, ARG_FORMAT)]
#[case::origin(RankArgs { origin: Some("95,0".to_owned()), ..RankArgs::default() }, ARG_ORIGIN)]
#[case::scope(RankArgs { range_scope: Some("world".to_owned()), ..RankArgs::default() }, ARG_RANGE_SCOPE)]
#[case::limit(RankArgs { limit: Some(0), ..RankArgs::default() }, ARG_LIMIT)]
fn invalid_flags_are_reported(#[case] args: RankArgs, #[case] expected: &'static str) {
    let dir = CatalogDir::new();
    let args = RankArgs {
        catalog: Some(dir.catalog()),
        ..args
    };
    match RankConfig::try_from(args).expect_err("invalid flag") {
        CliError::InvalidArgument { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "limit": "many" }));

    let err = crate::rank::config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let dir = CatalogDir::new();
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "catalog": dir.root().join("from-file.json").as_str(),
            "profile": "business",
            "limit": 3,
        }),
        None,
    );
    composer.push_environment(json!({
        "catalog": dir.catalog().as_str(),
        "profile": "tourism",
    }));
    composer.push_cli(json!({ "limit": 1 }));

    let config = crate::rank::config_from_layers_for_test(composer.layers())
        .expect("merged config should build");
    assert_eq!(config.catalog, dir.catalog());
    assert_eq!(config.scoring.profile, ProfileId::Tourism);
    assert_eq!(config.limit, Some(1));
}

#[rstest]
fn table_lists_cities_best_first() {
    let dir = CatalogDir::with_sample();
    let mut stdout = Vec::new();
    run_rank_with(rank_args(&dir), &StubLocatorBuilder::failing(), &mut stdout)
        .expect("rank should succeed");
    let output = stdout_text(stdout);
    assert_eq!(ranked_names(&output), ["Oslo", "Lima", "Dhaka"]);
}

#[rstest]
fn limit_truncates_the_listing() {
    let dir = CatalogDir::with_sample();
    let args = RankArgs {
        limit: Some(2),
        ..rank_args(&dir)
    };
    let mut stdout = Vec::new();
    run_rank_with(args, &StubLocatorBuilder::failing(), &mut stdout).expect("rank should succeed");
    assert_eq!(ranked_names(&stdout_text(stdout)), ["Oslo", "Lima"]);
}

#[rstest]
fn json_output_carries_rank_and_score() {
    let dir = CatalogDir::with_sample();
    let args = RankArgs {
        format: Some("json".to_owned()),
        ..rank_args(&dir)
    };
    let mut stdout = Vec::new();
    run_rank_with(args, &StubLocatorBuilder::failing(), &mut stdout).expect("rank should succeed");
    let rows: serde_json::Value =
        serde_json::from_str(&stdout_text(stdout)).expect("output should be JSON");
    let rows = rows.as_array().expect("array of rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["name"], "Oslo");
    assert_eq!(rows[0]["id"], 3_143_244);
    assert!(rows[0].get("distance_km").is_none());
    let first = rows[0]["score"].as_f64().expect("numeric score");
    let last = rows[2]["score"].as_f64().expect("numeric score");
    assert!(first > last);
}

#[rstest]
fn region_filter_restricts_the_listing() {
    let dir = CatalogDir::with_sample();
    let args = RankArgs {
        continents: Some("Asia, South America".to_owned()),
        ..rank_args(&dir)
    };
    let mut stdout = Vec::new();
    run_rank_with(args, &StubLocatorBuilder::failing(), &mut stdout).expect("rank should succeed");
    assert_eq!(ranked_names(&stdout_text(stdout)), ["Lima", "Dhaka"]);
}

#[rstest]
fn filter_without_matches_reports_no_data() {
    let dir = CatalogDir::with_sample();
    let args = RankArgs {
        countries: Some("Atlantis".to_owned()),
        ..rank_args(&dir)
    };
    let mut stdout = Vec::new();
    run_rank_with(args, &StubLocatorBuilder::failing(), &mut stdout).expect("rank should succeed");
    assert!(stdout_text(stdout).starts_with("no data"));
}

#[rstest]
#[case::missing_file(None)]
#[case::malformed_file(Some("{ not a catalog"))]
fn unreadable_catalog_reports_no_data(#[case] contents: Option<&str>) {
    let dir = CatalogDir::new();
    if let Some(text) = contents {
        dir.write_catalog(text);
    }
    let mut stdout = Vec::new();
    run_rank_with(rank_args(&dir), &StubLocatorBuilder::failing(), &mut stdout)
        .expect("an unreadable catalog still succeeds");
    let output = stdout_text(stdout);
    assert!(output.starts_with("no data"), "unexpected output: {output}");
}

#[rstest]
fn located_origin_adds_the_distance_column() {
    let dir = CatalogDir::with_sample();
    let args = RankArgs {
        locate: true,
        locate_url: Some("http://locator.test/json".to_owned()),
        distance_weight: Some(100),
        ..rank_args(&dir)
    };
    let builder = StubLocatorBuilder::answering(Point::new(-77.0, -12.0));
    let mut stdout = Vec::new();
    run_rank_with(args, &builder, &mut stdout).expect("rank should succeed");
    let output = stdout_text(stdout);
    assert_eq!(builder.requested(), ["http://locator.test/json"]);
    assert!(output.lines().next().is_some_and(|header| header.contains("km")));
    let first = output.lines().nth(1).expect("first row");
    assert!(first.ends_with("Lima (Peru, South America)"), "unexpected row: {first}");
}

#[rstest]
fn failed_lookup_ranks_without_distance() {
    let dir = CatalogDir::with_sample();
    let mut config = RankConfig {
        catalog: dir.catalog(),
        scoring: ScoringConfig::default(),
        origin: OriginChoice::Locate {
            url: "http://locator.test/json".to_owned(),
            timeout: Duration::from_secs(1),
        },
        limit: None,
        format: OutputFormat::Table,
    };
    config.scoring.distance.enabled = true;
    let catalog = JsonCatalogSource::new(dir.catalog()).load_or_empty();
    let mut stdout = Vec::new();
    execute_rank(&config, catalog, &StubLocatorBuilder::failing(), &mut stdout)
        .expect("rank should succeed");
    let output = stdout_text(stdout);
    assert!(!output.lines().next().is_some_and(|header| header.contains("km")));
    assert_eq!(ranked_names(&output), ["Oslo", "Lima", "Dhaka"]);
}

#[rstest]
fn empty_catalog_reports_no_data() {
    let dir = CatalogDir::new();
    let config = RankConfig::try_from(rank_args(&dir)).expect("config should build");
    let mut stdout = Vec::new();
    execute_rank(&config, Catalog::empty(), &StubLocatorBuilder::failing(), &mut stdout)
        .expect("rank should succeed");
    assert!(stdout_text(stdout).contains("is empty or could not be loaded"));
}

#[rstest]
fn zero_limit_does_not_claim_the_filter_matched_nothing() {
    let dir = CatalogDir::with_sample();
    let config = RankConfig {
        limit: Some(0),
        ..RankConfig::try_from(rank_args(&dir)).expect("config should build")
    };
    let catalog = JsonCatalogSource::new(dir.catalog()).load_or_empty();
    let mut stdout = Vec::new();
    execute_rank(&config, catalog, &StubLocatorBuilder::failing(), &mut stdout)
        .expect("rank should succeed");
    let output = stdout_text(stdout);
    assert!(!output.contains("no data"), "unexpected output: {output}");
    assert!(ranked_names(&output).is_empty());
}
