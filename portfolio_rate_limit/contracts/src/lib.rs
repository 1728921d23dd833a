use std::future::Future;

use chrono::{DateTime, Utc};

/// Storage for sliding window rate limits.
///
/// Implementations must perform [`hit`](RateLimitStore::hit) atomically per
/// key, so concurrent hits for the same key can never exceed `max`.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitStore: Send + Sync + 'static {
    /// Records a hit for `key` at `now`, unless `key` already has `max` or more
    /// hits after `window_start`.
    ///
    /// Hits at or before `window_start` are discarded. Returns `true` if the
    /// hit has been recorded and `false` if the limit has been reached.
    fn hit(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
        max: usize,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[cfg(feature = "mock")]
impl MockRateLimitStore {
    pub fn with_hit(
        mut self,
        key: String,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
        max: usize,
        result: bool,
    ) -> Self {
        self.expect_hit()
            .once()
            .with(
                mockall::predicate::eq(key),
                mockall::predicate::eq(now),
                mockall::predicate::eq(window_start),
                mockall::predicate::eq(max),
            )
            .return_once(move |_, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
