//! Failed-login throttling per username

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

use crate::settings::ThrottleSettings;

#[derive(Debug)]
struct FailureWindow {
    failures: u32,
    window_started: Instant,
    locked_until: Option<Instant>,
}

/// Locks a username out after repeated failed logins
#[derive(Debug, Clone)]
pub struct LoginThrottle {
    settings: ThrottleSettings,
    windows: Arc<Mutex<HashMap<String, FailureWindow>>>,
}

impl LoginThrottle {
    pub fn new(settings: ThrottleSettings) -> Self {
        Self {
            settings,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `username` may attempt a login right now
    pub async fn is_allowed(&self, username: &str) -> bool {
        self.is_allowed_at(username, Instant::now()).await
    }

    /// Count a failed login for `username`
    pub async fn record_failure(&self, username: &str) {
        self.record_failure_at(username, Instant::now()).await
    }

    /// Forget past failures after a successful login
    pub async fn record_success(&self, username: &str) {
        self.windows.lock().await.remove(username);
    }

    async fn is_allowed_at(&self, username: &str, now: Instant) -> bool {
        if !self.settings.enabled {
            return true;
        }

        let mut windows = self.windows.lock().await;
        let locked_until = windows.get(username).and_then(|w| w.locked_until);
        match locked_until {
            Some(until) if now < until => false,
            Some(_) => {
                windows.remove(username);
                true
            }
            None => true,
        }
    }

    async fn record_failure_at(&self, username: &str, now: Instant) {
        if !self.settings.enabled {
            return;
        }

        let window_length = Duration::from_secs(self.settings.window_seconds);
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| match w.locked_until {
            Some(until) => now < until,
            None => now.duration_since(w.window_started) < window_length,
        });

        let window = windows
            .entry(username.to_string())
            .or_insert(FailureWindow {
                failures: 0,
                window_started: now,
                locked_until: None,
            });

        if now.duration_since(window.window_started) >= window_length {
            window.failures = 0;
            window.window_started = now;
        }

        window.failures += 1;
        if window.failures >= self.settings.max_failures {
            window.locked_until = Some(now + Duration::from_secs(self.settings.lockout_seconds));
            warn!(
                "Locked logins for user {} for {} seconds",
                username, self.settings.lockout_seconds
            );
        }
    }
}
