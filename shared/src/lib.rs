//! Shared types for the Wagon ordering system
//!
//! Data model, error types, notification payloads and time helpers used by
//! both the store client and the engine.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{Notification, NotificationCategory, NotificationLevel};
pub use models::{ADMIN_USERNAME, Order, OrderStatus, PresenceEntry, Recipe, Session};
