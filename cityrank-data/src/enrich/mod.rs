//! Offline enrichment of catalog files.
//!
//! Records missing any of the [`CORE_FIELDS`] are sent, one at a time, to an
//! OpenAI-compatible chat-completions endpoint. The answer is parsed as a
//! JSON object and only the fields the record lacked are filled in. The
//! catalog file is rewritten once, atomically, after the whole pass.

use cityrank_core::Indicator;
use thiserror::Error;

use crate::transport::TransportError;

mod client;
mod job;
mod prompt;
mod response;

pub use client::{
    ChatCompletionClient, CompletionClient, CompletionClientConfig, DEFAULT_COMPLETION_ENDPOINT,
    DEFAULT_MODEL,
};
pub use job::{
    CityFailure, DEFAULT_REQUEST_DELAY, EnrichmentJob, EnrichmentJobError, EnrichmentOptions,
    EnrichmentReport, missing_fields,
};
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use response::parse_response;

/// Indicator fields the enrichment job tries to complete, in prompt order.
pub const CORE_FIELDS: [Indicator; 13] = [
    Indicator::AvgTemperature,
    Indicator::AvgPrecipitation,
    Indicator::GdpPerCapita,
    Indicator::GniPerCapita,
    Indicator::UnemploymentRate,
    Indicator::InflationRate,
    Indicator::LifeExpectancy,
    Indicator::InfantMortalityRate,
    Indicator::TertiaryEducationEnrollment,
    Indicator::PopulationDensity,
    Indicator::Pm25,
    Indicator::HomicideRate,
    Indicator::DoctorsPer1000,
];

/// Errors raised while enriching a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    /// The completion endpoint could not be reached or refused the request.
    #[error("completion request failed: {0}")]
    Transport(#[from] TransportError),
    /// The endpoint answered without any message content.
    #[error("completion response held no content")]
    EmptyResponse,
    /// The content could not be parsed as a JSON object.
    #[error("completion is not a JSON object: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
    /// The object parsed but held no usable value for any core field.
    #[error("completion held no usable indicator values")]
    NoValues,
}
