//! Share command: print the query string for a scoring configuration.

use std::io::Write;

use clap::Parser;
use cityrank_core::{ScoringConfig, share};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::rank::write_line;
use crate::scoring::{ScoringFlags, scoring_config};
use crate::{
    ARG_CONTINENTS, ARG_COUNTRIES, ARG_DISTANCE, ARG_DISTANCE_MAX_KM, ARG_DISTANCE_WEIGHT,
    ARG_PROFILE, ARG_RANGE_SCOPE, ARG_SHARE, ARG_WEIGHTS, CliError,
};

/// CLI arguments for the `share` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Encode profile, weights, region filter and distance settings \
                 as a query string. Passing the string back through --share \
                 on rank restores the same configuration.",
    about = "Print a shareable query string"
)]
#[ortho_config(prefix = "CITYRANK")]
pub(crate) struct ShareArgs {
    /// Existing query string to adjust.
    #[arg(long = ARG_SHARE, value_name = "query")]
    #[serde(default)]
    pub(crate) share: Option<String>,
    /// Audience profile: all, living, business or tourism.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Weight overrides, e.g. "pm25=8,gdp_per_capita=2".
    #[arg(long = ARG_WEIGHTS, value_name = "key=weight,...")]
    #[serde(default)]
    pub(crate) weights: Option<String>,
    /// Comma-separated countries to keep.
    #[arg(long = ARG_COUNTRIES, value_name = "list")]
    #[serde(default)]
    pub(crate) countries: Option<String>,
    /// Comma-separated continents to keep.
    #[arg(long = ARG_CONTINENTS, value_name = "list")]
    #[serde(default)]
    pub(crate) continents: Option<String>,
    /// Reference population for ranges: catalog or filtered.
    #[arg(long = ARG_RANGE_SCOPE, value_name = "scope")]
    #[serde(default)]
    pub(crate) range_scope: Option<String>,
    /// Mark distance scoring as enabled.
    #[arg(long = ARG_DISTANCE)]
    #[serde(default)]
    pub(crate) distance: bool,
    /// Weight of the distance term.
    #[arg(long = ARG_DISTANCE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) distance_weight: Option<u32>,
    /// Distance in km at or beyond which proximity scores zero.
    #[arg(long = ARG_DISTANCE_MAX_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_max_km: Option<u32>,
}

impl ShareArgs {
    pub(crate) fn into_config(self) -> Result<ScoringConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        scoring_config(&merged.flags())
    }

    pub(crate) fn flags(&self) -> ScoringFlags<'_> {
        ScoringFlags {
            share: self.share.as_deref(),
            profile: self.profile.as_deref(),
            weights: self.weights.as_deref(),
            countries: self.countries.as_deref(),
            continents: self.continents.as_deref(),
            range_scope: self.range_scope.as_deref(),
            distance: self.distance,
            distance_weight: self.distance_weight,
            distance_max_km: self.distance_max_km,
        }
    }
}

pub(super) fn run_share(args: ShareArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_share_with(args, &mut stdout)
}

pub(super) fn run_share_with(args: ShareArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    write_line(writer, &share::encode(&config))
}
