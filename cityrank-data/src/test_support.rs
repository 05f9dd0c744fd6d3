//! Test doubles for the network-facing traits.
//!
//! [`StubOriginLocator`] and [`StubCompletionClient`] answer with
//! pre-configured results without opening a connection.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use geo::Point;

use crate::enrich::{CompletionClient, EnrichError};
use crate::geolocate::{LocateError, OriginLocator};

/// Stub [`OriginLocator`] returning a fixed result.
///
/// # Example
///
/// ```
/// use cityrank_data::{OriginLocator, test_support::StubOriginLocator};
/// use geo::Point;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let locator = StubOriginLocator::with_origin(Point::new(13.4, 52.5));
/// assert_eq!(locator.locate().await, Ok(Point::new(13.4, 52.5)));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct StubOriginLocator {
    result: Result<Point<f64>, LocateError>,
    delay: Option<Duration>,
}

impl StubOriginLocator {
    /// Create a locator resolving to `origin`.
    #[must_use]
    pub fn with_origin(origin: Point<f64>) -> Self {
        Self {
            result: Ok(origin),
            delay: None,
        }
    }

    /// Create a locator failing with `error`.
    #[must_use]
    pub fn with_error(error: LocateError) -> Self {
        Self {
            result: Err(error),
            delay: None,
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait(?Send)]
impl OriginLocator for StubOriginLocator {
    async fn locate(&self) -> Result<Point<f64>, LocateError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// Stub [`CompletionClient`] replaying scripted replies in order.
///
/// Every prompt is recorded. Once the script runs out the client answers
/// with [`EnrichError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct StubCompletionClient {
    replies: RefCell<VecDeque<Result<String, EnrichError>>>,
    prompts: RefCell<Vec<String>>,
}

impl StubCompletionClient {
    /// Create a client replaying `replies`.
    pub fn scripted(replies: impl IntoIterator<Item = Result<String, EnrichError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Create a client answering every prompt with the same text.
    pub fn always(reply: &str, times: usize) -> Self {
        Self::scripted(std::iter::repeat_n(Ok(reply.to_owned()), times))
    }

    /// Queue another reply.
    pub fn push_reply(&self, reply: Result<String, EnrichError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CompletionClient for StubCompletionClient {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, EnrichError> {
        self.prompts.borrow_mut().push(prompt.to_owned());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(EnrichError::EmptyResponse))
    }
}
