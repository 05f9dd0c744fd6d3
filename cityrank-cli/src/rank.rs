//! Rank command implementation for the CityRank CLI.

use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use cityrank_core::{Catalog, CatalogSource, RankedCity, ScoringConfig};
use cityrank_data::{
    DEFAULT_LOCATE_TIMEOUT, DEFAULT_LOCATE_URL, HttpOriginLocator, HttpOriginLocatorConfig,
    JsonCatalogSource, OriginLocator, locate_with_timeout,
};
use cityrank_scorer::RankingSession;
use geo::Point;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::scoring::{ScoringFlags, invalid, parse_origin, scoring_config};
use crate::{
    ARG_CATALOG, ARG_CONTINENTS, ARG_COUNTRIES, ARG_DISTANCE_MAX_KM, ARG_DISTANCE_WEIGHT,
    ARG_FORMAT, ARG_LIMIT, ARG_LOCATE, ARG_LOCATE_TIMEOUT_MS, ARG_LOCATE_URL, ARG_ORIGIN,
    ARG_PROFILE, ARG_RANGE_SCOPE, ARG_SHARE, ARG_WEIGHTS, CliError, ENV_RANK_CATALOG,
    build_runtime,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every city in a JSON catalog and print them best first. \
                 Weights start from the selected audience profile and can be \
                 adjusted individually, restored from a shared query string, \
                 or combined with a distance term around an origin.",
    about = "Rank the cities of a catalog"
)]
#[ortho_config(prefix = "CITYRANK")]
pub(crate) struct RankArgs {
    /// Path to the JSON catalog.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Shared configuration query string to start from.
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
    /// Fixed origin as "lat,lon"; enables distance scoring.
    #[arg(long = ARG_ORIGIN, value_name = "lat,lon", conflicts_with = ARG_LOCATE)]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Look up the origin from the network; enables distance scoring.
    #[arg(long = ARG_LOCATE)]
    #[serde(default)]
    pub(crate) locate: bool,
    /// Geolocation endpoint used with --locate.
    #[arg(long = ARG_LOCATE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) locate_url: Option<String>,
    /// Give up on the origin lookup after this many milliseconds.
    #[arg(long = ARG_LOCATE_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) locate_timeout_ms: Option<u64>,
    /// Weight of the distance term.
    #[arg(long = ARG_DISTANCE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) distance_weight: Option<u32>,
    /// Distance in km at or beyond which proximity scores zero.
    #[arg(long = ARG_DISTANCE_MAX_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_max_km: Option<u32>,
    /// Print only the top N cities.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Output format: table or json.
    #[arg(long = ARG_FORMAT, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<String>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// How the ranking origin is obtained.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OriginChoice {
    /// Rank without distance unless a shared configuration enabled it.
    Unset,
    /// A known position.
    Fixed(Point<f64>),
    /// Ask a geolocation service.
    Locate { url: String, timeout: Duration },
}

/// Table or JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}' (expected table or json)")),
        }
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) scoring: ScoringConfig,
    pub(crate) origin: OriginChoice,
    pub(crate) limit: Option<usize>,
    pub(crate) format: OutputFormat,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.clone().ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_RANK_CATALOG,
        })?;
        let origin = match (&args.origin, args.locate) {
            (Some(raw), _) => OriginChoice::Fixed(parse_origin(raw)?),
            (None, true) => OriginChoice::Locate {
                url: args
                    .locate_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOCATE_URL.to_owned()),
                timeout: args
                    .locate_timeout_ms
                    .map_or(DEFAULT_LOCATE_TIMEOUT, Duration::from_millis),
            },
            (None, false) => OriginChoice::Unset,
        };
        let mut scoring = scoring_config(&ScoringFlags {
            share: args.share.as_deref(),
            profile: args.profile.as_deref(),
            weights: args.weights.as_deref(),
            countries: args.countries.as_deref(),
            continents: args.continents.as_deref(),
            range_scope: args.range_scope.as_deref(),
            distance: origin != OriginChoice::Unset,
            distance_weight: args.distance_weight,
            distance_max_km: args.distance_max_km,
        })?;
        if origin == OriginChoice::Unset && scoring.distance.enabled {
            info!("shared configuration enables distance but no origin was given; ignoring it");
            scoring.distance.enabled = false;
        }
        let format = match args.format.as_deref() {
            Some(raw) => {
                OutputFormat::from_str(raw).map_err(|reason| invalid(ARG_FORMAT, raw, reason))?
            }
            None => OutputFormat::default(),
        };
        if args.limit == Some(0) {
            return Err(invalid(ARG_LIMIT, "0", "must be at least 1"));
        }
        Ok(Self {
            catalog,
            scoring,
            origin,
            limit: args.limit,
            format,
        })
    }
}

/// Builds the origin locator for a `rank` invocation.
pub(super) trait LocatorBuilder {
    fn build(&self, url: &str, timeout: Duration) -> Result<Box<dyn OriginLocator>, CliError>;
}

pub(super) struct HttpLocatorBuilder;

impl LocatorBuilder for HttpLocatorBuilder {
    fn build(&self, url: &str, timeout: Duration) -> Result<Box<dyn OriginLocator>, CliError> {
        let config = HttpOriginLocatorConfig::new(url).with_timeout(timeout);
        let locator =
            HttpOriginLocator::with_config(config).map_err(|source| CliError::BuildClient {
                url: url.to_owned(),
                source,
            })?;
        Ok(Box::new(locator))
    }
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &HttpLocatorBuilder, &mut stdout)
}

pub(super) fn run_rank_with(
    args: RankArgs,
    builder: &dyn LocatorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let catalog = JsonCatalogSource::new(config.catalog.clone()).load_or_empty();
    execute_rank(&config, catalog, builder, writer)
}

pub(super) fn execute_rank(
    config: &RankConfig,
    catalog: Catalog,
    builder: &dyn LocatorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    if catalog.is_empty() {
        return write_no_data(writer, &config.catalog);
    }
    let mut session = RankingSession::new(catalog, config.scoring.clone());
    match &config.origin {
        OriginChoice::Unset => {}
        OriginChoice::Fixed(origin) => session.set_origin(*origin),
        OriginChoice::Locate { url, timeout } => {
            let locator = builder.build(url, *timeout)?;
            let request = session.request_origin();
            let runtime = build_runtime()?;
            let origin = runtime.block_on(locate_with_timeout(locator.as_ref(), *timeout));
            session.resolve_origin(request, origin);
        }
    }
    let distance_active = session.distance_active();
    let ranked = session.rank();
    if ranked.is_empty() {
        return write_line(writer, "no data: no city matches the region filter");
    }
    let shown = config.limit.map_or(ranked.len(), |limit| limit.min(ranked.len()));
    let rows = &ranked[..shown];
    match config.format {
        OutputFormat::Table => write_table(writer, rows, distance_active),
        OutputFormat::Json => write_json(writer, rows),
    }
}

/// One line of JSON output.
#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    rank: usize,
    id: u64,
    name: &'a str,
    country: &'a str,
    continent: &'a str,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

fn write_table(
    writer: &mut dyn Write,
    rows: &[RankedCity<'_>],
    distance_active: bool,
) -> Result<(), CliError> {
    let header = if distance_active {
        format!("{:>4}  {:>6}  {:>9}  city", "rank", "score", "km")
    } else {
        format!("{:>4}  {:>6}  city", "rank", "score")
    };
    write_line(writer, &header)?;
    for (index, row) in rows.iter().enumerate() {
        let place = format!("{} ({}, {})", row.city.name, row.city.country, row.city.continent);
        let line = match (distance_active, row.distance_km) {
            (true, Some(km)) => format!("{:>4}  {:>6.3}  {km:>9.0}  {place}", index + 1, row.score),
            (true, None) => format!("{:>4}  {:>6.3}  {:>9}  {place}", index + 1, row.score, "-"),
            (false, _) => format!("{:>4}  {:>6.3}  {place}", index + 1, row.score),
        };
        write_line(writer, &line)?;
    }
    Ok(())
}

fn write_json(writer: &mut dyn Write, rows: &[RankedCity<'_>]) -> Result<(), CliError> {
    let payload: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| RankedRow {
            rank: index + 1,
            id: row.city.id.0,
            name: &row.city.name,
            country: &row.city.country,
            continent: &row.city.continent,
            score: row.score,
            distance_km: row.distance_km,
        })
        .collect();
    let text = serde_json::to_string_pretty(&payload).map_err(CliError::SerialiseOutput)?;
    write_line(writer, &text)
}

fn write_no_data(writer: &mut dyn Write, catalog: &Utf8Path) -> Result<(), CliError> {
    write_line(
        writer,
        &format!("no data: catalog {catalog} is empty or could not be loaded"),
    )
}

pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writer
        .write_all(line.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
