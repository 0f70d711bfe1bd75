//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every rejected user action surfaces as one of these, and the `message`
/// is what ends up in the user-facing notification.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (offending id, field, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a generic validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Price was zero or negative
    pub fn invalid_price(price: i64) -> Self {
        Self::new(ErrorCode::InvalidPrice).with_detail("price", price)
    }

    /// Recipe name was blank
    pub fn empty_recipe_name() -> Self {
        Self::new(ErrorCode::EmptyRecipeName)
    }

    /// Reference to a recipe id that is not on the menu
    pub fn unknown_recipe(recipe_id: i64) -> Self {
        Self::with_message(
            ErrorCode::RecipeNotFound,
            format!("Recipe {} is not on the menu", recipe_id),
        )
        .with_detail("recipe_id", recipe_id)
    }

    /// Reference to an order id that is not active
    pub fn unknown_order(order_id: i64) -> Self {
        Self::with_message(
            ErrorCode::OrderNotFound,
            format!("Order {} is not active", order_id),
        )
        .with_detail("order_id", order_id)
    }

    /// Remote store failure
    pub fn remote_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RemoteUnavailable, msg)
    }

    /// Operation needs the admin session
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    /// No session is active
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Wrong admin password
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    // ==================== Classification ====================

    /// Bad user input: recovered locally, no state change
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ValidationFailed | ErrorCode::InvalidPrice | ErrorCode::EmptyRecipeName
        )
    }

    /// Reference to a missing recipe or order: the operation was a no-op
    pub fn is_unknown_entity(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NotFound | ErrorCode::RecipeNotFound | ErrorCode::OrderNotFound
        )
    }

    /// Remote store failure
    pub fn is_remote(&self) -> bool {
        self.code == ErrorCode::RemoteUnavailable
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
