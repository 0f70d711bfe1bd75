//! HTTP store client - REST access to the document store
//!
//! Every path is addressed as `{base_url}{path}.json`. A `200` carrying
//! `null` means "nothing stored there".

use crate::store::RemoteStore;
use crate::{ClientError, ClientResult, StoreConfig};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Network store client
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpStore {
    /// Create a new HTTP store client from configuration
    pub fn new(config: &StoreConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            format!("{}/.json", self.base_url)
        } else if path.starts_with('/') {
            format!("{}{}.json", self.base_url, path)
        } else {
            format!("{}/{}.json", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = &self.auth_token {
            request = request.query(&[("auth", token.as_str())]);
        }
        request
    }

    /// Send a request and decode the JSON body of a successful response
    async fn execute(&self, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET with errors surfaced
    pub async fn try_read(&self, path: &str) -> ClientResult<Option<Value>> {
        let value = self.execute(self.request(Method::GET, path)).await?;
        Ok((!value.is_null()).then_some(value))
    }

    /// PUT with errors surfaced
    pub async fn try_write(&self, path: &str, value: &Value) -> ClientResult<()> {
        self.execute(self.request(Method::PUT, path).json(value)).await?;
        Ok(())
    }

    /// DELETE with errors surfaced
    pub async fn try_delete(&self, path: &str) -> ClientResult<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn read(&self, path: &str) -> Option<Value> {
        match self.try_read(path).await {
            Ok(value) => {
                tracing::debug!(path = %path, found = value.is_some(), "Store read");
                value
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Store read failed");
                None
            }
        }
    }

    async fn write(&self, path: &str, value: &Value) -> bool {
        match self.try_write(path, value).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Store write");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Store write failed");
                false
            }
        }
    }

    async fn delete(&self, path: &str) -> bool {
        match self.try_delete(path).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Store delete");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Store delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let store = HttpStore::new(&StoreConfig::new("https://db.example.com/")).unwrap();
        assert_eq!(store.base_url(), "https://db.example.com");
        assert_eq!(store.url("/orders"), "https://db.example.com/orders.json");
        assert_eq!(store.url("orders/1"), "https://db.example.com/orders/1.json");
        assert_eq!(store.url("/"), "https://db.example.com/.json");
    }
}
