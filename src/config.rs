//! Configuration types.

use std::time::Duration;

/// Wizard server configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Port the REST server binds to.
    pub port: u16,
    /// Endpoint completed records are posted to. `None` logs them instead.
    pub submit_url: Option<String>,
    /// Sessions idle longer than this are pruned.
    pub session_idle_timeout: Duration,
    /// Idle-session sweep interval.
    pub prune_interval: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            submit_url: None,
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            prune_interval: Duration::from_secs(60),
        }
    }
}

impl WizardConfig {
    /// Build config from `ONBOARD_*` environment variables, falling back
    /// to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port: u16 = std::env::var("ONBOARD_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let submit_url = std::env::var("ONBOARD_SUBMIT_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let session_idle_timeout = std::env::var("ONBOARD_SESSION_IDLE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_idle_timeout);

        let prune_interval = std::env::var("ONBOARD_PRUNE_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.prune_interval);

        Self {
            port,
            submit_url,
            session_idle_timeout,
            prune_interval,
        }
    }
}
