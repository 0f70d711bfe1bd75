use std::time::Duration;
use wagon_client::StoreConfig;

/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// loaded first by [`setup_environment`](crate::setup_environment)):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | STORE_URL | http://localhost:9000 | Remote document store |
/// | STORE_AUTH_TOKEN | - | `auth` query token |
/// | REQUEST_TIMEOUT_SECS | 10 | Per-request timeout |
/// | POLL_INTERVAL_MS | 3000 | Sync loop period |
/// | ERROR_BACKOFF_MS | 5000 | Extra sleep after a faulted tick |
/// | PRESENCE_TIMEOUT_SECS | 30 | Online window |
/// | SHUTDOWN_TIMEOUT_MS | 5000 | Wait for the sync loop on disconnect |
/// | ADMIN_PASSWORD | qwerty | Shared admin password |
/// | LOG_LEVEL | info | Logger level |
/// | LOG_DIR | - | Rolling log directory |
///
/// # Example
///
/// ```ignore
/// STORE_URL=https://my-db.firebaseio.com POLL_INTERVAL_MS=1000 ./app
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote store base URL
    pub store_url: String,
    /// Optional store auth token
    pub store_auth_token: Option<String>,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Sync loop period (milliseconds)
    pub poll_interval_ms: u64,
    /// Extra sleep after a faulted tick (milliseconds)
    pub error_backoff_ms: u64,
    /// Presence entries older than this are offline (seconds)
    pub presence_timeout_secs: i64,
    /// How long disconnect waits for the sync loop (milliseconds)
    pub shutdown_timeout_ms: u64,
    /// Shared admin password
    pub admin_password: String,
    /// Logger level
    pub log_level: String,
    /// Rolling log directory
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            store_url: std::env::var("STORE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            store_auth_token: std::env::var("STORE_AUTH_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 10),
            poll_interval_ms: env_or("POLL_INTERVAL_MS", 3000),
            error_backoff_ms: env_or("ERROR_BACKOFF_MS", 5000),
            presence_timeout_secs: env_or("PRESENCE_TIMEOUT_SECS", 30),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 5000),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "qwerty".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// Set the store URL
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = url.into();
        self
    }

    /// Set the sync loop period
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the extra sleep after a faulted tick
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Set the presence window
    pub fn with_presence_timeout(mut self, secs: i64) -> Self {
        self.presence_timeout_secs = secs;
        self
    }

    /// Set the admin password
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = password.into();
        self
    }

    /// Sync loop period, never below one millisecond
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Store client configuration derived from this config
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.store_url).with_timeout(self.request_timeout_secs);
        match &self.store_auth_token {
            Some(token) => config.with_auth_token(token),
            None => config,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = Config::from_env()
            .with_store_url("http://127.0.0.1:1234")
            .with_poll_interval(Duration::from_millis(50))
            .with_error_backoff(Duration::from_millis(10))
            .with_presence_timeout(5)
            .with_admin_password("pw");

        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.error_backoff(), Duration::from_millis(10));
        assert_eq!(config.presence_timeout_secs, 5);
        assert_eq!(config.admin_password, "pw");

        let store = config.store_config();
        assert_eq!(store.base_url, "http://127.0.0.1:1234");
        assert_eq!(store.timeout, config.request_timeout_secs);
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = Config::from_env().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval(), Duration::from_millis(1));

        let config = Config {
            poll_interval_ms: 0,
            ..Config::from_env()
        };
        assert!(!config.poll_interval().is_zero());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        assert_eq!(env_or::<u64>("WAGON_TEST_UNSET_VARIABLE", 7), 7);
    }
}
