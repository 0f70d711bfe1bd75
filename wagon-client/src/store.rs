//! Remote store contract and path layout

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Path-addressed JSON document store
///
/// Each call is a single round trip. Implementations swallow every failure:
/// `read` reports `None` for "no data this cycle" (error or empty path),
/// `write` and `delete` report `false`. No retries happen here; callers
/// rely on their own polling cadence.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read the value at `path`, `None` when absent or unavailable
    async fn read(&self, path: &str) -> Option<Value>;

    /// Replace the value at `path`
    async fn write(&self, path: &str, value: &Value) -> bool;

    /// Remove the value at `path`
    async fn delete(&self, path: &str) -> bool;
}

/// Read and decode a typed value, logging decode failures
pub async fn read_json<T: DeserializeOwned>(store: &dyn RemoteStore, path: &str) -> Option<T> {
    let value = store.read(path).await?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Discarding undecodable store value");
            None
        }
    }
}

/// Encode and write a typed value
pub async fn write_json<T: Serialize + ?Sized>(store: &dyn RemoteStore, path: &str, value: &T) -> bool {
    match serde_json::to_value(value) {
        Ok(v) => store.write(path, &v).await,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Failed to encode store value");
            false
        }
    }
}

/// Store path layout
///
/// ```text
/// /menu                            {id: {name, price}}
/// /orders/{order_id}               Order
/// /online_users/{name}             {name, joined, last_seen}
/// /online_users/{name}/last_seen   unix seconds
/// /notifications/{name}/{id}       Notification
/// ```
pub mod paths {
    pub const MENU: &str = "/menu";
    pub const ORDERS: &str = "/orders";
    pub const ONLINE_USERS: &str = "/online_users";
    pub const NOTIFICATIONS: &str = "/notifications";

    /// Characters the store refuses inside a key
    const FORBIDDEN: [char; 6] = ['.', '$', '#', '[', ']', '/'];

    /// Make a user-supplied name usable as a single path segment
    pub fn sanitize_key(raw: &str) -> String {
        raw.chars()
            .map(|c| if FORBIDDEN.contains(&c) || c.is_control() { '_' } else { c })
            .collect()
    }

    pub fn order(order_id: i64) -> String {
        format!("{}/{}", ORDERS, order_id)
    }

    pub fn presence(username: &str) -> String {
        format!("{}/{}", ONLINE_USERS, sanitize_key(username))
    }

    pub fn last_seen(username: &str) -> String {
        format!("{}/last_seen", presence(username))
    }

    pub fn notifications(username: &str) -> String {
        format!("{}/{}", NOTIFICATIONS, sanitize_key(username))
    }

    pub fn notification(username: &str, notification_id: &str) -> String {
        format!("{}/{}", notifications(username), sanitize_key(notification_id))
    }
}
