use std::time::Duration;

/// Exponential backoff used after rate-limit responses.
///
/// The delay before retry `attempt` (starting at 0) is `base * 2^attempt`,
/// clamped to `max_delay`. `max_retries` bounds the number of retries;
/// `None` retries forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    max_delay: Duration,
    max_retries: Option<u32>,
}

impl BackoffPolicy {
    pub const DEFAULT_BASE: Duration = Duration::from_millis(1000);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
    pub const DEFAULT_MAX_RETRIES: u32 = 6;

    /// No retry cap and no delay ceiling.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            max_delay: Duration::MAX,
            max_retries: None,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Delay before retry number `attempt`, ignoring the retry cap.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        1_u32
            .checked_shl(attempt)
            .and_then(|factor| self.base.checked_mul(factor))
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay before retry number `attempt`, or `None` once the cap is reached.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if self.max_retries.is_some_and(|max| attempt >= max) {
            return None;
        }
        Some(self.delay_for(attempt))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            max_delay: Self::DEFAULT_MAX_DELAY,
            max_retries: Some(Self::DEFAULT_MAX_RETRIES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_from_one_second() {
        let policy = BackoffPolicy::default();
        let delays: Vec<_> = (0..4).map(|attempt| policy.delay_for(attempt)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
    }

    #[test]
    fn delay_is_clamped_to_ceiling() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for(6), Duration::from_secs(60));
        assert_eq!(policy.delay_for(40), Duration::from_secs(60));
    }

    #[test]
    fn cap_stops_retries() {
        let policy = BackoffPolicy::default().with_max_retries(Some(2));
        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(2), None);
    }

    #[test]
    fn unlimited_never_stops() {
        let policy = BackoffPolicy::unlimited();
        assert_eq!(policy.max_retries(), None);
        assert_eq!(policy.next_delay(10), Some(Duration::from_secs(1024)));
        assert!(policy.next_delay(u32::MAX).is_some());
    }
}
