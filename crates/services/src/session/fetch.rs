use quiz_core::Question;
use quiz_source::{QuestionSource, TriviaQuery};

use crate::backoff::BackoffPolicy;
use crate::error::SessionError;

/// Fetch one batch, sleeping and retrying while the source reports rate limiting.
///
/// Only `SourceError::RateLimited` is retried; every other failure is returned
/// as-is on the first occurrence.
///
/// # Errors
///
/// Returns `SessionError::RetriesExhausted` once the backoff cap is reached and
/// `SessionError::Source` for any other source failure.
pub async fn fetch_with_backoff(
    source: &dyn QuestionSource,
    query: &TriviaQuery,
    backoff: &BackoffPolicy,
) -> Result<Vec<Question>, SessionError> {
    let mut attempt = 0_u32;
    loop {
        match source.fetch(query).await {
            Err(err) if err.is_rate_limited() => {
                let Some(delay) = backoff.next_delay(attempt) else {
                    return Err(SessionError::RetriesExhausted { retries: attempt });
                };
                tracing::info!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "too many requests, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
            other => return Ok(other?),
        }
    }
}
