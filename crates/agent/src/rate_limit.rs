//! Sliding-window rate limiting keyed by user id
//!
//! Owned by the host and checked before [`ConversationSession::submit`].
//! Memory is bounded: at most `max_tracked_keys` keys are tracked, idle keys
//! are purged and the least recently seen key is evicted when full.
//!
//! [`ConversationSession::submit`]: crate::ConversationSession::submit

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use legalmind_config::RateLimitConfig;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many requests from {key}, retry in {}ms", .retry_after.as_millis())]
    Exceeded { key: String, retry_after: Duration },
}

#[derive(Debug)]
struct KeyWindow {
    hits: VecDeque<Instant>,
    last_seen: Instant,
}

/// Per-key sliding-window limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    keys: Mutex<HashMap<String, KeyWindow>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            keys: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record a request for `key`, failing if the window is full
    pub fn check(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_at(key, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        if !self.config.enabled {
            return Ok(());
        }

        let window = self.config.window();
        let mut keys = self.keys.lock();

        if !keys.contains_key(key) {
            Self::purge(&mut keys, now, window);
            if keys.len() >= self.config.max_tracked_keys {
                Self::evict_least_recent(&mut keys);
            }
        }

        let entry = keys.entry(key.to_string()).or_insert_with(|| KeyWindow {
            hits: VecDeque::new(),
            last_seen: now,
        });
        entry.last_seen = now;

        while let Some(&oldest) = entry.hits.front() {
            if now.saturating_duration_since(oldest) >= window {
                entry.hits.pop_front();
            } else {
                break;
            }
        }

        if entry.hits.len() >= self.config.max_requests as usize {
            let retry_after = entry
                .hits
                .front()
                .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
                .unwrap_or(window);
            tracing::debug!(key, retry_after_ms = retry_after.as_millis() as u64, "Rate limited");
            return Err(RateLimitError::Exceeded {
                key: key.to_string(),
                retry_after,
            });
        }

        entry.hits.push_back(now);
        Ok(())
    }

    /// Drop keys idle for longer than the window
    pub fn purge_idle(&self, now: Instant) {
        let mut keys = self.keys.lock();
        Self::purge(&mut keys, now, self.config.window());
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.keys.lock().len()
    }

    fn purge(keys: &mut HashMap<String, KeyWindow>, now: Instant, window: Duration) {
        keys.retain(|_, w| now.saturating_duration_since(w.last_seen) < window);
    }

    fn evict_least_recent(keys: &mut HashMap<String, KeyWindow>) {
        let oldest = keys
            .iter()
            .min_by_key(|(_, w)| w.last_seen)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Evicting least recently seen rate limit key");
            keys.remove(&key);
        }
    }
}
