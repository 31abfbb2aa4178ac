use std::time::Duration;

/// Why a fetch was started. Decides what happens when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Nothing has been shown yet.
    Initial,
    /// Stale content is on screen and stays there on failure.
    Background,
}

/// Fetch cadence for the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Fixed background poll interval.
    pub poll_interval: Duration,
    /// Delay before retrying a failed initial load.
    pub initial_retry: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            initial_retry: Duration::from_secs(5),
        }
    }
}

impl RefreshPolicy {
    /// How long to wait before retrying a failed fetch, if at all.
    ///
    /// Background failures are never retried early; the next regular poll
    /// picks them up.
    pub fn retry_after(&self, origin: FetchOrigin) -> Option<Duration> {
        match origin {
            FetchOrigin::Initial => Some(self.initial_retry),
            FetchOrigin::Background => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_initial_failures_retry() {
        let policy = RefreshPolicy::default();
        assert_eq!(
            policy.retry_after(FetchOrigin::Initial),
            Some(Duration::from_secs(5))
        );
        assert_eq!(policy.retry_after(FetchOrigin::Background), None);
    }
}
