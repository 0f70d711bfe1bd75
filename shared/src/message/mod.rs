//! User-facing notification payloads

mod notification;

pub use notification::{Notification, NotificationCategory, NotificationLevel};
