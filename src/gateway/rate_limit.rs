// src/gateway/rate_limit.rs

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Sliding-window request admission control, one window per identifier.
///
/// The limiter holds no knowledge of what is being limited; the gateway
/// client calls [`can_admit`](Self::can_admit) and [`record`](Self::record)
/// as a pair immediately before dispatch. An over-quota call is rejected
/// synchronously, never queued or delayed.
pub struct RateLimiter {
    windows: DashMap<String, Vec<Instant>>,
    quota: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            quota,
            window,
        }
    }

    /// Prune timestamps older than the window for this identifier, then
    /// check whether another request fits under the quota.
    pub fn can_admit(&self, identifier: &str) -> bool {
        let mut entry = self.windows.entry(identifier.to_string()).or_default();
        let window = self.window;
        entry.retain(|t| t.elapsed() < window);
        (entry.len() as u32) < self.quota
    }

    /// Record one admitted request for this identifier.
    pub fn record(&self, identifier: &str) {
        self.windows
            .entry(identifier.to_string())
            .or_default()
            .push(Instant::now());
    }

    /// Requests currently counted against this identifier's window.
    pub fn in_window(&self, identifier: &str) -> usize {
        self.windows
            .get(identifier)
            .map(|w| {
                let window = self.window;
                w.iter().filter(|t| t.elapsed() < window).count()
            })
            .unwrap_or(0)
    }
}
