//! Command-line flags for the `quiz` binary.

use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use quiz_source::{OpenTdbConfig, OpenTdbError};
use services::{BackoffPolicy, SessionConfig};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "quiz",
    version,
    about = "Answer a batch of easy trivia questions in the terminal",
    long_about = "Fetches ten easy questions from Open Trivia DB and asks them one by one.\n\n\
                  Environment: QUIZ_API_URL, QUIZ_MAX_RETRIES, QUIZ_TIMEOUT_SECS \
                  (flags take precedence)."
)]
pub struct Cli {
    /// Trivia endpoint to query.
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<Url>,

    /// Give up after this many rate-limited retries.
    #[arg(long = "max-retries", value_name = "N", conflicts_with = "unlimited_retries")]
    pub max_retries: Option<u32>,

    /// Keep retrying rate-limited requests forever.
    #[arg(long = "unlimited-retries")]
    pub unlimited_retries: bool,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    /// Environment configuration with flag overrides applied.
    ///
    /// # Errors
    ///
    /// Returns `OpenTdbError` if `QUIZ_API_URL` is invalid.
    pub fn source_config(&self) -> Result<OpenTdbConfig, OpenTdbError> {
        let mut config = OpenTdbConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_endpoint(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::from_env();
        let backoff = if self.unlimited_retries {
            BackoffPolicy::unlimited()
        } else if let Some(max) = self.max_retries {
            config.backoff.with_max_retries(Some(max))
        } else {
            config.backoff
        };
        config.with_backoff(backoff)
    }
}
