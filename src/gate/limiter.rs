use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

// sweep stale windows once the table is this big
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }
}

#[derive(Debug)]
struct RateState {
    remaining: u32,
    window_start: Instant,
}

/// Fixed-window point budget per caller key.
#[derive(Clone)]
pub struct RateLimiter {
    points: u32,
    window: Duration,
    states: Arc<Mutex<HashMap<String, RateState>>>,
}

impl RateLimiter {
    pub fn new(points: u32, window: Duration) -> Self {
        Self {
            points,
            window,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Consume one point for `key`. Never waits for the window to reset.
    pub fn admit(&self, key: &str) -> Admission {
        let now = Instant::now();
        let mut states = self.states.lock();

        if states.len() >= PRUNE_THRESHOLD && !states.contains_key(key) {
            let window = self.window;
            states.retain(|_, s| now.saturating_duration_since(s.window_start) < window);
        }

        let state = states.entry(key.to_string()).or_insert(RateState {
            remaining: self.points,
            window_start: now,
        });

        if now.saturating_duration_since(state.window_start) >= self.window {
            state.remaining = self.points;
            state.window_start = now;
        }

        if state.remaining == 0 {
            let elapsed = now.saturating_duration_since(state.window_start);
            return Admission::Denied {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        state.remaining -= 1;
        Admission::Allowed {
            remaining: state.remaining,
        }
    }
}
