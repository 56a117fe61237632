//! Sliding-window rate limit for login attempts.
//!
//! Per-client-address attempt timestamps kept in process memory. State is
//! not shared across instances and resets on restart; this is a documented
//! limitation of the single-process deployment model.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

pub const LOGIN_WINDOW_SECONDS: i64 = 10 * 60;
pub const LOGIN_MAX_ATTEMPTS: usize = 5;

/// Injectable limiter owned by the auth layer; cheap to clone.
#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<Mutex<HashMap<String, Vec<i64>>>>,
    window_seconds: i64,
    max_attempts: usize,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(LOGIN_WINDOW_SECONDS, LOGIN_MAX_ATTEMPTS)
    }
}

impl LoginRateLimiter {
    pub fn new(window_seconds: i64, max_attempts: usize) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            window_seconds,
            max_attempts,
        }
    }

    /// Whether `address` may attempt a login right now. Prunes timestamps
    /// older than the window; does not record the attempt itself. Only
    /// `register_failure` inserts, so addresses that never fail never
    /// occupy the map.
    pub fn allow(&self, address: &str) -> bool {
        let now = Utc::now().timestamp();
        let mut attempts = self.attempts.lock();
        let Some(entry) = attempts.get_mut(address) else {
            return true;
        };
        entry.retain(|ts| now - ts <= self.window_seconds);
        if entry.is_empty() {
            attempts.remove(address);
            return true;
        }
        entry.len() < self.max_attempts
    }

    /// Record a failed login. Successful logins are never recorded.
    pub fn register_failure(&self, address: &str) {
        let now = Utc::now().timestamp();
        self.attempts
            .lock()
            .entry(address.to_string())
            .or_default()
            .push(now);
    }
}
