//! Client configuration

/// Configuration for connecting to the remote document store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store base URL (e.g., "https://example-rtdb.firebaseio.com")
    pub base_url: String,

    /// Optional token sent as the `auth` query parameter
    pub auth_token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout: 10,
        }
    }

    /// Set the auth token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP store from this configuration
    pub fn build_http_store(&self) -> crate::ClientResult<crate::HttpStore> {
        crate::HttpStore::new(self)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("http://localhost:9000")
    }
}
