//! Chat-completions transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EnrichError;
use crate::transport::{ClientBuildError, build_client, convert_reqwest_error, parse_endpoint};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default user agent for completion requests.
pub const DEFAULT_USER_AGENT: &str = "cityrank-enrich/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const APP_TITLE: &str = "CityRank";

/// Something that answers a prompt with text.
#[async_trait(?Send)]
pub trait CompletionClient {
    /// Send `prompt` under the `system` instruction and return the reply.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, EnrichError>;
}

/// Configuration for [`ChatCompletionClient`].
#[derive(Clone, PartialEq)]
pub struct CompletionClientConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for CompletionClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for CompletionClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_owned(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl CompletionClientConfig {
    /// Create a configuration authenticated with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
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

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// [`CompletionClient`] speaking the OpenAI chat-completions protocol.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: CompletionClientConfig,
}

impl ChatCompletionClient {
    /// Create a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error when the API key is empty, the endpoint is invalid or
    /// the HTTP client fails to build.
    pub fn with_config(config: CompletionClientConfig) -> Result<Self, ClientBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientBuildError::MissingApiKey);
        }
        parse_endpoint(&config.endpoint)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &CompletionClientConfig {
        &self.config
    }

    fn request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait(?Send)]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, EnrichError> {
        let url = self.config.endpoint.as_str();
        let timeout = self.config.timeout;
        let body = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("X-Title", APP_TITLE)
            .json(&self.request(system, prompt))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?;
        reply_content(&body)
    }
}

fn reply_content(body: &str) -> Result<String, EnrichError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|err| EnrichError::Parse {
        message: err.to_string(),
    })?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(EnrichError::EmptyResponse)
}
