//! HTTP plumbing shared by the origin locator and the completion client.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Failures raised while talking to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error talking to {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// No answer arrived within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
}

/// Failures raised while constructing an HTTP-backed client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured endpoint is not a valid absolute URL.
    #[error("invalid endpoint URL {url:?}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The endpoint requires credentials and none were configured.
    #[error("no API key configured")]
    MissingApiKey,
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, ClientBuildError> {
    Url::parse(raw).map_err(|source| ClientBuildError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ClientBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ClientBuildError::HttpClient)
}

pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
