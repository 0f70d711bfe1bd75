//! Presence Model

use serde::{Deserialize, Serialize};

/// Presence record stored under `/online_users/{name}`
///
/// Entries are never marked offline; they age out once `last_seen` falls
/// outside the online window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub name: String,
    /// Local wall-clock `HH:MM:SS` when the user connected
    pub joined: String,
    /// Unix seconds of the last heartbeat
    pub last_seen: i64,
}

impl PresenceEntry {
    /// Fresh entry for a user connecting now
    pub fn joining(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joined: crate::util::wall_clock(),
            last_seen: crate::util::now_secs(),
        }
    }

    /// Online iff `now - last_seen < window_secs`
    pub fn is_online(&self, now: i64, window_secs: i64) -> bool {
        is_online(self.last_seen, now, window_secs)
    }
}

/// Online check shared by typed and loosely decoded entries
pub fn is_online(last_seen: i64, now: i64, window_secs: i64) -> bool {
    now - last_seen < window_secs
}
