//! Enrich command implementation for the CityRank CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use cityrank_data::enrich::{
    ChatCompletionClient, CompletionClient, CompletionClientConfig, EnrichmentJob,
    EnrichmentOptions, EnrichmentReport,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::rank::write_line;
use crate::{
    ARG_API_KEY, ARG_CATALOG, ARG_DELAY_MS, ARG_ENDPOINT, ARG_LIMIT, ARG_MODEL, CliError,
    ENV_ENRICH_API_KEY, ENV_ENRICH_CATALOG, build_runtime, require_existing,
};

/// CLI arguments for the `enrich` subcommand.
#[derive(Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask a chat-completion model for the indicator values each \
                 city is missing and write them back into the catalog. \
                 Values already present are never replaced. The API key \
                 is best supplied through the environment.",
    about = "Fill missing indicator values in a catalog"
)]
#[ortho_config(prefix = "CITYRANK")]
pub(crate) struct EnrichArgs {
    /// Path to the JSON catalog to update in place.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Bearer token for the completion endpoint.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Chat-completions endpoint URL.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Model identifier.
    #[arg(long = ARG_MODEL, value_name = "model")]
    #[serde(default)]
    pub(crate) model: Option<String>,
    /// Pause between requests in milliseconds.
    #[arg(long = ARG_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) delay_ms: Option<u64>,
    /// Stop after this many requests.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl std::fmt::Debug for EnrichArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichArgs")
            .field("catalog", &self.catalog)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("delay_ms", &self.delay_ms)
            .field("limit", &self.limit)
            .finish()
    }
}

impl EnrichArgs {
    pub(crate) fn into_config(self) -> Result<EnrichConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        EnrichConfig::try_from(merged)
    }
}

/// Resolved `enrich` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EnrichConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) client: CompletionClientConfig,
    pub(crate) options: EnrichmentOptions,
}

impl EnrichConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.catalog, ARG_CATALOG)
    }
}

impl TryFrom<EnrichArgs> for EnrichConfig {
    type Error = CliError;

    fn try_from(args: EnrichArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_ENRICH_CATALOG,
        })?;
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_API_KEY,
                env: ENV_ENRICH_API_KEY,
            })?;
        let mut client = CompletionClientConfig::new(api_key);
        if let Some(endpoint) = args.endpoint {
            client = client.with_endpoint(endpoint);
        }
        if let Some(model) = args.model {
            client = client.with_model(model);
        }
        let mut options = EnrichmentOptions::default();
        if let Some(delay_ms) = args.delay_ms {
            options = options.with_delay(Duration::from_millis(delay_ms));
        }
        if let Some(limit) = args.limit {
            options = options.with_limit(limit);
        }
        Ok(Self {
            catalog,
            client,
            options,
        })
    }
}

pub(super) fn run_enrich(args: EnrichArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let client = ChatCompletionClient::with_config(config.client.clone()).map_err(|source| {
        CliError::BuildClient {
            url: config.client.endpoint.clone(),
            source,
        }
    })?;
    let mut stdout = std::io::stdout().lock();
    run_enrich_with(&config, &client, &mut stdout)?;
    Ok(())
}

pub(super) fn run_enrich_with(
    config: &EnrichConfig,
    client: &dyn CompletionClient,
    writer: &mut dyn Write,
) -> Result<EnrichmentReport, CliError> {
    config.validate_sources()?;
    let job = EnrichmentJob::new(client, config.options.clone());
    let runtime = build_runtime()?;
    let report = runtime.block_on(job.run(&config.catalog))?;
    write_report(writer, &report)?;
    Ok(report)
}

fn write_report(writer: &mut dyn Write, report: &EnrichmentReport) -> Result<(), CliError> {
    write_line(
        writer,
        &format!(
            "{} records, {} already complete, {} requested, {} enriched, {} fields filled",
            report.records, report.complete, report.requested, report.enriched, report.fields_filled
        ),
    )?;
    for failure in &report.failures {
        write_line(
            writer,
            &format!("failed: #{} {}: {}", failure.position, failure.name, failure.error),
        )?;
    }
    let outcome = if report.written {
        "catalog updated"
    } else {
        "catalog unchanged"
    };
    write_line(writer, outcome)
}
