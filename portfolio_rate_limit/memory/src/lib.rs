use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use portfolio_rate_limit_contracts::RateLimitStore;
use portfolio_utils::trace_instrument;
use tokio::sync::Mutex;
use tracing::debug;

/// In-process rate limit store.
///
/// Keys whose newest hit has left the window are evicted lazily, at most once
/// per window length, so the map only holds keys that are currently limited.
/// State is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateLimitStore {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    hits: HashMap<String, VecDeque<DateTime<Utc>>>,
    last_eviction: Option<DateTime<Utc>>,
}

impl MemoryRateLimitStore {
    /// Returns the number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.state.lock().await.hits.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    #[trace_instrument(skip(self))]
    async fn hit(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
        max: usize,
    ) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        state.evict_expired(now, window_start);

        let hits = state.hits.entry(key.to_owned()).or_default();
        hits.retain(|&hit| hit > window_start);

        if hits.len() >= max {
            return Ok(false);
        }

        hits.push_back(now);
        Ok(true)
    }
}

impl State {
    fn evict_expired(&mut self, now: DateTime<Utc>, window_start: DateTime<Utc>) {
        let window = now - window_start;
        if self
            .last_eviction
            .is_some_and(|last_eviction| now - last_eviction < window)
        {
            return;
        }

        let before = self.hits.len();
        self.hits
            .retain(|_, hits| hits.iter().any(|&hit| hit > window_start));
        self.last_eviction = Some(now);

        let evicted = before - self.hits.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.hits.len(), "evicted expired rate limit keys");
        }
    }
}
