use std::env;
use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::Question;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::source::{QuestionSource, SourceError, TriviaQuery};
use mapping::ApiResponse;

mod mapping;

pub const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while building an `OpenTdbSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpenTdbError {
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct OpenTdbConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

impl OpenTdbConfig {
    /// Read `QUIZ_API_URL` and `QUIZ_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `OpenTdbError::InvalidEndpoint` if `QUIZ_API_URL` does not parse.
    pub fn from_env() -> Result<Self, OpenTdbError> {
        let mut config = Self::default();
        if let Some(raw) = env::var("QUIZ_API_URL").ok().filter(|v| !v.trim().is_empty()) {
            config.endpoint = Url::parse(raw.trim())?;
        }
        if let Some(secs) = env::var("QUIZ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OpenTdbConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint should be valid"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Render an error together with its cause chain, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}

/// Question source backed by the Open Trivia DB REST API.
#[derive(Clone, Debug)]
pub struct OpenTdbSource {
    client: Client,
    endpoint: Url,
}

impl OpenTdbSource {
    /// Build a source with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `OpenTdbError::Client` if the HTTP client cannot be created.
    pub fn new(config: OpenTdbConfig) -> Result<Self, OpenTdbError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    /// Build a source around an existing client, e.g. one shared with other services.
    #[must_use]
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<Question>, SourceError> {
        tracing::debug!(endpoint = %self.endpoint, ?query, "requesting trivia batch");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| SourceError::Network(describe(&e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body: ApiResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                SourceError::Malformed(describe(&e))
            } else {
                SourceError::Network(describe(&e))
            }
        })?;
        if let Some(code) = body.response_code {
            tracing::debug!(response_code = code, "trivia batch received");
        }
        Ok(body.into_questions())
    }
}
