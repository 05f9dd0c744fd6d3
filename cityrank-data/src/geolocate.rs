//! Resolving the user's origin for distance scoring.
//!
//! The origin is a best-effort input: [`locate_with_timeout`] turns every
//! failure, including a slow answer, into `None` so the caller can rank
//! without the proximity term.

use std::time::Duration;

use async_trait::async_trait;
use geo::Point;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::transport::{
    ClientBuildError, TransportError, build_client, convert_reqwest_error, parse_endpoint,
};

/// Default user agent for lookups.
pub const DEFAULT_USER_AGENT: &str = "cityrank-locate/0.1";

/// Default IP geolocation endpoint.
pub const DEFAULT_LOCATE_URL: &str = "https://ipapi.co/json/";

/// Default bound on one lookup.
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(8);

const LATITUDE_KEYS: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_KEYS: [&str; 2] = ["longitude", "lon"];

/// Errors raised by an origin lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The lookup service could not be reached or refused the request.
    #[error("origin lookup failed: {0}")]
    Transport(#[from] TransportError),
    /// The service answered without a usable position.
    #[error("origin lookup returned no usable position: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },
}

/// Source of the user's position.
#[async_trait(?Send)]
pub trait OriginLocator {
    /// Resolve the current origin.
    async fn locate(&self) -> Result<Point<f64>, LocateError>;
}

/// Configuration for [`HttpOriginLocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOriginLocatorConfig {
    /// Endpoint answering with a JSON object holding the position.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpOriginLocatorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LOCATE_URL.to_owned(),
            timeout: DEFAULT_LOCATE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpOriginLocatorConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Looks up the origin through an IP geolocation service.
///
/// The service must answer `GET url` with a JSON object carrying
/// `latitude`/`longitude` or `lat`/`lon`, as numbers or numeric strings.
#[derive(Debug, Clone)]
pub struct HttpOriginLocator {
    client: Client,
    config: HttpOriginLocatorConfig,
}

impl HttpOriginLocator {
    /// Create a locator for `url` with default settings.
    ///
    /// # Errors
    /// Returns an error when `url` is invalid or the HTTP client fails to
    /// build.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpOriginLocatorConfig::new(url))
    }

    /// Create a locator with explicit configuration.
    ///
    /// # Errors
    /// Returns an error when the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: HttpOriginLocatorConfig) -> Result<Self, ClientBuildError> {
        parse_endpoint(&config.url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &HttpOriginLocatorConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl OriginLocator for HttpOriginLocator {
    async fn locate(&self) -> Result<Point<f64>, LocateError> {
        let url = self.config.url.as_str();
        let timeout = self.config.timeout;
        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?;
        parse_origin(&body)
    }
}

/// Extract a position from a geolocation response body.
///
/// # Examples
/// ```
/// use cityrank_data::parse_origin;
/// use geo::Point;
///
/// let origin = parse_origin(r#"{"latitude": 48.85, "longitude": "2.35"}"#)?;
/// assert_eq!(origin, Point::new(2.35, 48.85));
/// # Ok::<(), cityrank_data::LocateError>(())
/// ```
///
/// # Errors
/// Returns [`LocateError::Parse`] when the body is not a JSON object with a
/// valid latitude and longitude.
pub fn parse_origin(body: &str) -> Result<Point<f64>, LocateError> {
    let value: Value = serde_json::from_str(body).map_err(|err| LocateError::Parse {
        message: err.to_string(),
    })?;
    let lat = coordinate(&value, &LATITUDE_KEYS)
        .filter(|lat| (-90.0..=90.0).contains(lat))
        .ok_or_else(|| missing("latitude"))?;
    let lon = coordinate(&value, &LONGITUDE_KEYS)
        .filter(|lon| (-180.0..=180.0).contains(lon))
        .ok_or_else(|| missing("longitude"))?;
    Ok(Point::new(lon, lat))
}

/// Run `locator`, giving up after `timeout`.
///
/// Failures and timeouts are logged at `warn` and yield `None`.
pub async fn locate_with_timeout(
    locator: &dyn OriginLocator,
    timeout: Duration,
) -> Option<Point<f64>> {
    match tokio::time::timeout(timeout, locator.locate()).await {
        Ok(Ok(origin)) => {
            debug!("origin resolved to ({}, {})", origin.y(), origin.x());
            Some(origin)
        }
        Ok(Err(err)) => {
            warn!("{err}; ranking without distance");
            None
        }
        Err(_) => {
            warn!(
                "origin lookup timed out after {}ms; ranking without distance",
                timeout.as_millis()
            );
            None
        }
    }
}

fn coordinate(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|v: &f64| v.is_finite())
}

fn missing(field: &str) -> LocateError {
    LocateError::Parse {
        message: format!("missing or invalid {field}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubOriginLocator;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"latitude": 51.5, "longitude": -0.12}"#, Point::new(-0.12, 51.5))]
    #[case(r#"{"lat": "-33.9", "lon": "18.4", "city": "Cape Town"}"#, Point::new(18.4, -33.9))]
    #[case(r#"{"latitude": null, "lat": 1.0, "lon": 2.0}"#, Point::new(2.0, 1.0))]
    fn parses_positions(#[case] body: &str, #[case] expected: Point<f64>) {
        assert_eq!(parse_origin(body), Ok(expected));
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"lat": 10.0}"#)]
    #[case(r#"{"lat": 91.0, "lon": 0.0}"#)]
    #[case(r#"{"error": true, "reason": "RateLimited"}"#)]
    fn rejects_bodies_without_a_position(#[case] body: &str) {
        assert!(matches!(parse_origin(body), Err(LocateError::Parse { .. })));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpOriginLocatorConfig::new("http://geo.example.test/json")
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.url, "http://geo.example.test/json");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn invalid_urls_are_rejected_at_construction() {
        let err = HttpOriginLocator::new("geo.example.test").expect_err("relative url");
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn resolved_origin_is_returned() {
        let locator = StubOriginLocator::with_origin(Point::new(2.0, 3.0));
        let origin = locate_with_timeout(&locator, Duration::from_secs(1)).await;
        assert_eq!(origin, Some(Point::new(2.0, 3.0)));
    }

    #[tokio::test]
    async fn failed_lookup_yields_none() {
        let locator = StubOriginLocator::with_error(LocateError::Parse {
            message: "denied".into(),
        });
        assert_eq!(locate_with_timeout(&locator, Duration::from_secs(1)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out() {
        let locator = StubOriginLocator::with_origin(Point::new(2.0, 3.0))
            .with_delay(Duration::from_secs(30));
        assert_eq!(locate_with_timeout(&locator, Duration::from_secs(8)).await, None);
    }
}
