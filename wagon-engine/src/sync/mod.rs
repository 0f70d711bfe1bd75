//! Synchronization Loop
//!
//! [`SyncWorker`] polls the remote store on a fixed period and mirrors the
//! shared collections into the [`StateCache`](crate::cache::StateCache).
//! Changes reach the UI as [`SyncEvent`]s on the [`EventBus`].

pub mod codec;
pub mod events;
pub mod worker;

pub use events::{EventBus, SyncEvent};
pub use worker::{SyncSettings, SyncWorker, TickReport};

use thiserror::Error;

/// Fault inside a sync tick
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unexpected {found} at {path}")]
    UnexpectedShape {
        path: &'static str,
        found: &'static str,
    },
}
