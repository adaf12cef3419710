use std::env;

use quiz_source::TriviaQuery;

use crate::backoff::BackoffPolicy;

/// Settings for a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub query: TriviaQuery,
    pub backoff: BackoffPolicy,
}

impl SessionConfig {
    /// Read `QUIZ_MAX_RETRIES` on top of the defaults.
    ///
    /// The value is a retry count or `unlimited`; anything else is ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("QUIZ_MAX_RETRIES") {
            if let Some(max_retries) = parse_max_retries(&raw) {
                config.backoff = config.backoff.with_max_retries(max_retries);
            }
        }
        config
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}

/// `Some(None)` means unlimited; `None` means the value was not understood.
fn parse_max_retries(raw: &str) -> Option<Option<u32>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("unlimited") {
        return Some(None);
    }
    raw.parse::<u32>().ok().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_retry_counts() {
        assert_eq!(parse_max_retries("3"), Some(Some(3)));
        assert_eq!(parse_max_retries(" 0 "), Some(Some(0)));
        assert_eq!(parse_max_retries("Unlimited"), Some(None));
        assert_eq!(parse_max_retries("lots"), None);
    }

    #[test]
    fn default_uses_fixed_batch() {
        let config = SessionConfig::default();
        assert_eq!(config.query, TriviaQuery::default());
        assert_eq!(
            config.backoff.max_retries(),
            Some(BackoffPolicy::DEFAULT_MAX_RETRIES)
        );
    }
}
