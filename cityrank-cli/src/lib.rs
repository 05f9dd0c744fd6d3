//! Command-line interface for the CityRank engine.
//!
//! Subcommands rank a JSON catalog, print the shareable query string for a
//! set of scoring flags, list the audience profiles, and run the offline
//! enrichment pass that fills missing indicator values.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod enrich;
mod error;
mod profiles;
mod rank;
mod scoring;
mod share;

pub use error::CliError;

use enrich::{EnrichArgs, run_enrich};
use rank::{RankArgs, run_rank};
use share::{ShareArgs, run_share};

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_SHARE: &str = "share";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_WEIGHTS: &str = "weights";
pub(crate) const ARG_COUNTRIES: &str = "countries";
pub(crate) const ARG_CONTINENTS: &str = "continents";
pub(crate) const ARG_RANGE_SCOPE: &str = "range-scope";
pub(crate) const ARG_ORIGIN: &str = "origin";
pub(crate) const ARG_LOCATE: &str = "locate";
pub(crate) const ARG_LOCATE_URL: &str = "locate-url";
pub(crate) const ARG_LOCATE_TIMEOUT_MS: &str = "locate-timeout-ms";
pub(crate) const ARG_DISTANCE: &str = "distance";
pub(crate) const ARG_DISTANCE_WEIGHT: &str = "distance-weight";
pub(crate) const ARG_DISTANCE_MAX_KM: &str = "distance-max-km";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_MODEL: &str = "model";
pub(crate) const ARG_DELAY_MS: &str = "delay-ms";
pub(crate) const ENV_RANK_CATALOG: &str = "CITYRANK_CMDS_RANK_CATALOG";
pub(crate) const ENV_ENRICH_CATALOG: &str = "CITYRANK_CMDS_ENRICH_CATALOG";
pub(crate) const ENV_ENRICH_API_KEY: &str = "CITYRANK_CMDS_ENRICH_API_KEY";

/// Run the CityRank CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Share(args) => run_share(args),
        Command::Profiles => {
            let mut stdout = std::io::stdout().lock();
            profiles::write_profiles(&mut stdout)
        }
        Command::Enrich(args) => run_enrich(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "cityrank",
    about = "Rank cities by weighted indicators and enrich city catalogs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank the cities of a JSON catalog.
    Rank(RankArgs),
    /// Print the shareable query string for a scoring configuration.
    Share(ShareArgs),
    /// List the audience profiles and their preset weights.
    Profiles,
    /// Fill missing indicator values using a chat-completion model.
    Enrich(EnrichArgs),
}

pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match cityrank_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
