//! Turning scoring flags into a [`ScoringConfig`].
//!
//! A shared query string, when given, replaces the defaults first; the
//! individual flags then adjust the result, so `--share` plus `--weights`
//! behaves like opening a shared link and nudging a slider.

use std::collections::BTreeSet;
use std::str::FromStr;

use cityrank_core::{Indicator, ProfileId, RangeScope, ScoringConfig, share};
use geo::Point;

use crate::{
    ARG_CONTINENTS, ARG_COUNTRIES, ARG_ORIGIN, ARG_PROFILE, ARG_RANGE_SCOPE, ARG_WEIGHTS,
    CliError,
};

/// Scoring-related flags common to `rank` and `share`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ScoringFlags<'a> {
    pub(crate) share: Option<&'a str>,
    pub(crate) profile: Option<&'a str>,
    pub(crate) weights: Option<&'a str>,
    pub(crate) countries: Option<&'a str>,
    pub(crate) continents: Option<&'a str>,
    pub(crate) range_scope: Option<&'a str>,
    pub(crate) distance: bool,
    pub(crate) distance_weight: Option<u32>,
    pub(crate) distance_max_km: Option<u32>,
}

pub(crate) fn scoring_config(flags: &ScoringFlags<'_>) -> Result<ScoringConfig, CliError> {
    let defaults = ScoringConfig::default();
    let mut config = match flags.share {
        Some(query) => share::decode(query, &defaults),
        None => defaults,
    };
    if let Some(raw) = flags.profile {
        let profile = ProfileId::from_str(raw).map_err(|reason| invalid(ARG_PROFILE, raw, reason))?;
        config.select_profile(profile);
    }
    if let Some(raw) = flags.weights {
        for (indicator, weight) in parse_weights(raw)? {
            config.weights.set_weight(indicator, weight);
        }
    }
    if let Some(raw) = flags.countries {
        config.filter.countries = split_list(raw);
    }
    if let Some(raw) = flags.continents {
        config.filter.continents = split_list(raw);
    }
    if let Some(raw) = flags.range_scope {
        config.range_scope =
            RangeScope::from_str(raw).map_err(|reason| invalid(ARG_RANGE_SCOPE, raw, reason))?;
    }
    if flags.distance {
        config.distance.enabled = true;
    }
    if let Some(weight) = flags.distance_weight {
        config.distance.weight = weight;
    }
    if let Some(max_km) = flags.distance_max_km {
        config.distance.max_km = max_km;
    }
    Ok(config)
}

/// Parse `key=weight` pairs separated by commas.
pub(crate) fn parse_weights(raw: &str) -> Result<Vec<(Indicator, u32)>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, weight) = entry
                .split_once('=')
                .ok_or_else(|| invalid(ARG_WEIGHTS, entry, "expected key=weight"))?;
            let indicator =
                Indicator::from_str(key).map_err(|reason| invalid(ARG_WEIGHTS, entry, reason))?;
            let weight = weight
                .trim()
                .parse::<u32>()
                .map_err(|err| invalid(ARG_WEIGHTS, entry, err.to_string()))?;
            Ok((indicator, weight))
        })
        .collect()
}

/// Parse a `lat,lon` pair in decimal degrees.
pub(crate) fn parse_origin(raw: &str) -> Result<Point<f64>, CliError> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| invalid(ARG_ORIGIN, raw, "expected lat,lon"))?;
    let lat = degrees(raw, lat, 90.0)?;
    let lon = degrees(raw, lon, 180.0)?;
    Ok(Point::new(lon, lat))
}

fn degrees(raw: &str, part: &str, bound: f64) -> Result<f64, CliError> {
    part.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= bound)
        .ok_or_else(|| invalid(ARG_ORIGIN, raw, format!("coordinate out of range ±{bound}")))
}

pub(crate) fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn invalid(field: &'static str, value: &str, reason: impl Into<String>) -> CliError {
    CliError::InvalidArgument {
        field,
        value: value.to_owned(),
        reason: reason.into(),
    }
}
