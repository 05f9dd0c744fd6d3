//! Encode a [`ScoringConfig`] as a shareable query string and back.
//!
//! The format is a flat `application/x-www-form-urlencoded` string:
//!
//! | key | value |
//! |---|---|
//! | `country` | repeated country filter entry |
//! | `continent` | repeated continent filter entry |
//! | `profile` | active profile |
//! | `w` | comma-separated weights in [`Indicator::ALL`] order |
//! | `dist` | `1` or `0` |
//! | `dw` | distance weight |
//! | `dmax` | distance cut-off in km |
//! | `scope` | `catalog` or `filtered` |
//!
//! Decoding never fails. A weight block with the wrong length or any entry
//! that is not a non-negative integer is dropped as a whole; every other
//! malformed key is dropped on its own. A profile without a usable weight
//! block is selected the same way a user switches profile, merging its
//! presets over the default weights.

use log::debug;
use url::form_urlencoded;

use crate::{Indicator, ScoringConfig, WeightVector};

/// Serialise `config` into a query string without a leading `?`.
///
/// # Examples
/// ```
/// use cityrank_core::{ScoringConfig, share};
///
/// let config = ScoringConfig::default();
/// let query = share::encode(&config);
/// assert!(query.starts_with("profile=living&w="));
/// assert_eq!(share::decode(&query, &ScoringConfig::default()), config);
/// ```
pub fn encode(config: &ScoringConfig) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("profile", config.profile.as_str());
    let weights = config
        .weights
        .to_ordered()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.append_pair("w", &weights);
    for country in &config.filter.countries {
        serializer.append_pair("country", country);
    }
    for continent in &config.filter.continents {
        serializer.append_pair("continent", continent);
    }
    serializer.append_pair("dist", if config.distance.enabled { "1" } else { "0" });
    serializer.append_pair("dw", &config.distance.weight.to_string());
    serializer.append_pair("dmax", &config.distance.max_km.to_string());
    serializer.append_pair("scope", config.range_scope.as_str());
    serializer.finish()
}

/// Parse a query string over `defaults`.
///
/// A leading `?` is ignored. Keys absent from `query` keep their value from
/// `defaults`; country and continent entries, when present, replace the
/// default filter on their axis.
pub fn decode(query: &str, defaults: &ScoringConfig) -> ScoringConfig {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut config = defaults.clone();
    let mut profile = None;
    let mut weights = None;
    let mut countries = Vec::new();
    let mut continents = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "country" if !value.is_empty() => countries.push(value.into_owned()),
            "continent" if !value.is_empty() => continents.push(value.into_owned()),
            "profile" => match value.parse() {
                Ok(parsed) => profile = Some(parsed),
                Err(err) => debug!("ignoring shared profile: {err}"),
            },
            "w" => match decode_weights(&value) {
                Some(parsed) => weights = Some(parsed),
                None => debug!("ignoring malformed shared weights '{value}'"),
            },
            "dist" => match &*value {
                "1" => config.distance.enabled = true,
                "0" => config.distance.enabled = false,
                other => debug!("ignoring shared distance toggle '{other}'"),
            },
            "dw" => match value.parse() {
                Ok(weight) => config.distance.weight = weight,
                Err(_) => debug!("ignoring shared distance weight '{value}'"),
            },
            "dmax" => match value.parse::<u32>() {
                Ok(max_km) if max_km > 0 => config.distance.max_km = max_km,
                _ => debug!("ignoring shared distance cut-off '{value}'"),
            },
            "scope" => match value.parse() {
                Ok(scope) => config.range_scope = scope,
                Err(err) => debug!("ignoring shared range scope: {err}"),
            },
            other => debug!("ignoring unknown shared key '{other}'"),
        }
    }

    match (profile, weights) {
        (Some(profile), Some(weights)) => {
            config.profile = profile;
            config.weights = weights;
        }
        (Some(profile), None) => config.select_profile(profile),
        (None, Some(weights)) => config.weights = weights,
        (None, None) => {}
    }
    if !countries.is_empty() {
        config.filter.countries = countries.into_iter().collect();
    }
    if !continents.is_empty() {
        config.filter.continents = continents.into_iter().collect();
    }
    config
}

fn decode_weights(raw: &str) -> Option<WeightVector> {
    let parsed = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let dense: [u32; Indicator::COUNT] = parsed.try_into().ok()?;
    Some(WeightVector::from_ordered(dense))
}
