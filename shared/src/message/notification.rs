use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Session and connection events
    System,
    /// Order submission and lifecycle
    Order,
    /// Menu edits
    Menu,
}

// ==================== Payload ====================

/// User-facing notification
///
/// Produced on every lifecycle event and every rejected action. When
/// `recipient` is set the notification is addressed to that customer and
/// may travel through the remote store to reach their client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    /// Customer the notification is meant for (None = whoever is looking)
    #[serde(default)]
    pub recipient: Option<String>,
    /// Local wall-clock `HH:MM:SS` at creation
    pub time: String,
    /// Creation time (unix millis)
    pub created_at: i64,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            title: title.into(),
            message: message.into(),
            level,
            category,
            recipient: None,
            time: crate::util::wall_clock(),
            created_at: crate::util::now_millis(),
        }
    }

    pub fn info(
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Info, category, title, message)
    }

    pub fn success(
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Success, category, title, message)
    }

    pub fn warning(
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Warning, category, title, message)
    }

    pub fn error(
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Error, category, title, message)
    }

    /// Address the notification to a customer
    pub fn to_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }
}

impl From<&crate::error::AppError> for Notification {
    /// Rejected actions become error notifications carrying the error message
    fn from(err: &crate::error::AppError) -> Self {
        use crate::error::ErrorCategory;

        let category = match err.code.category() {
            ErrorCategory::Menu => NotificationCategory::Menu,
            ErrorCategory::Order => NotificationCategory::Order,
            _ => NotificationCategory::System,
        };
        Self::error(category, "Error", err.message.clone())
    }
}
