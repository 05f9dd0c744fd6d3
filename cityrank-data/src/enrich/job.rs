//! The enrichment pass over one catalog file.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cityrank_core::{CatalogError, Indicator, IndicatorValues};
use log::{info, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use super::client::CompletionClient;
use super::prompt::{SYSTEM_PROMPT, build_prompt};
use super::response::parse_response;
use super::{CORE_FIELDS, EnrichError};
use crate::catalog::{CatalogDocument, read_document, record_from_object};

/// Default pause between two completion requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Tuning for [`EnrichmentJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOptions {
    /// Pause between two consecutive requests.
    pub delay: Duration,
    /// Maximum number of records to send, if any.
    pub limit: Option<usize>,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_REQUEST_DELAY,
            limit: None,
        }
    }
}

impl EnrichmentOptions {
    /// Set the pause between requests.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Stop after sending `limit` records.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One record the job could not enrich.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFailure {
    /// 1-based position of the record in the file.
    pub position: usize,
    /// City name, for reporting.
    pub name: String,
    /// What went wrong.
    pub error: EnrichError,
}

/// Outcome of an enrichment pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrichmentReport {
    /// Records in the catalog.
    pub records: usize,
    /// Records that already had every core field.
    pub complete: usize,
    /// Records sent to the completion endpoint.
    pub requested: usize,
    /// Records that gained at least one value.
    pub enriched: usize,
    /// Total number of fields filled.
    pub fields_filled: usize,
    /// Per-record failures, in file order.
    pub failures: Vec<CityFailure>,
    /// Whether the catalog file was rewritten.
    pub written: bool,
}

impl EnrichmentReport {
    /// Report whether every request succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors that abort an enrichment run.
#[derive(Debug, Error)]
pub enum EnrichmentJobError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Load(#[from] CatalogError),
    /// The enriched catalog could not be serialised.
    #[error("failed to serialise enriched catalog: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Replacing the catalog file failed; the original is untouched.
    #[error("failed to write enriched catalog to {path:?}: {source}")]
    Write {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Core fields that `object` lacks, in prompt order.
///
/// A field is missing when it is absent, `null` or not a finite number.
pub fn missing_fields(object: &Map<String, Value>) -> Vec<Indicator> {
    CORE_FIELDS
        .into_iter()
        .filter(|indicator| {
            object
                .get(indicator.as_str())
                .and_then(Value::as_f64)
                .is_none_or(|value| !value.is_finite())
        })
        .collect()
}

/// Fills gaps in a catalog through a [`CompletionClient`].
pub struct EnrichmentJob<'c> {
    client: &'c dyn CompletionClient,
    options: EnrichmentOptions,
}

impl<'c> EnrichmentJob<'c> {
    /// Create a job sending prompts through `client`.
    pub fn new(client: &'c dyn CompletionClient, options: EnrichmentOptions) -> Self {
        Self { client, options }
    }

    /// The job's options.
    pub fn options(&self) -> &EnrichmentOptions {
        &self.options
    }

    /// Enrich the catalog at `path` and replace it when anything changed.
    ///
    /// # Errors
    /// Fails when the catalog cannot be read, serialised or written.
    /// Per-record failures are reported, not returned.
    pub async fn run(&self, path: &Utf8Path) -> Result<EnrichmentReport, EnrichmentJobError> {
        let mut document = read_document(path)?;
        let mut report = self.enrich_document(&mut document).await;
        if report.fields_filled > 0 {
            let text = document.to_json().map_err(EnrichmentJobError::Serialise)?;
            cityrank_fs::write_file_atomically(path, text.as_bytes()).map_err(|source| {
                EnrichmentJobError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            report.written = true;
        }
        info!(
            "enrichment of {path}: {} requested, {} enriched, {} fields filled, {} failed",
            report.requested,
            report.enriched,
            report.fields_filled,
            report.failures.len()
        );
        Ok(report)
    }

    /// Enrich `document` in memory.
    pub async fn enrich_document(&self, document: &mut CatalogDocument) -> EnrichmentReport {
        let mut report = EnrichmentReport {
            records: document.len(),
            ..EnrichmentReport::default()
        };
        let ids = document.record_ids();
        for ((index, object), id) in document.records_mut().iter_mut().enumerate().zip(ids) {
            let missing = missing_fields(object);
            if missing.is_empty() {
                report.complete += 1;
                continue;
            }
            if self
                .options
                .limit
                .is_some_and(|limit| report.requested >= limit)
            {
                info!("request limit reached; leaving remaining records untouched");
                break;
            }
            if report.requested > 0 && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
            report.requested += 1;

            let position = index + 1;
            let city = record_from_object(id, object);
            info!("enriching {} ({} missing fields)", city.name, missing.len());
            match self.fetch(&build_prompt(&city)).await {
                Ok(values) => {
                    let filled = fill_missing(object, &missing, |indicator| values.get(indicator));
                    if filled > 0 {
                        report.enriched += 1;
                        report.fields_filled += filled;
                    }
                }
                Err(error) => {
                    warn!("enrichment failed for {}: {error}", city.name);
                    report.failures.push(CityFailure {
                        position,
                        name: city.name,
                        error,
                    });
                }
            }
        }
        report
    }

    async fn fetch(&self, prompt: &str) -> Result<IndicatorValues, EnrichError> {
        let reply = self.client.complete(SYSTEM_PROMPT, prompt).await?;
        parse_response(&reply)
    }
}

fn fill_missing(
    object: &mut Map<String, Value>,
    missing: &[Indicator],
    value_of: impl Fn(Indicator) -> Option<f64>,
) -> usize {
    let mut filled = 0;
    for &indicator in missing {
        if let Some(value) = value_of(indicator) {
            object.insert(indicator.as_str().to_owned(), Value::from(value));
            filled += 1;
        }
    }
    filled
}
