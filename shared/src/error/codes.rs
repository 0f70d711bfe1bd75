//! Error codes for the Wagon ordering system
//!
//! Codes are grouped by the leading digit:
//! - 0xxx: General errors
//! - 1xxx: Session / authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 9xxx: Remote store / system errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enum
///
/// Represented as `u16` on the wire so UI layers in other languages can
/// switch on it without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Session ====================
    /// No session is active
    NotAuthenticated = 1001,
    /// Wrong admin password
    InvalidCredentials = 1002,

    // ==================== 2xxx: Permission ====================
    /// Admin session required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,

    // ==================== 6xxx: Menu ====================
    /// Recipe not found
    RecipeNotFound = 6001,
    /// Price must be positive
    InvalidPrice = 6002,
    /// Recipe name is empty
    EmptyRecipeName = 6003,

    // ==================== 9xxx: System ====================
    /// Remote store unreachable or rejected the request
    RemoteUnavailable = 9001,
    /// Internal error
    InternalError = 9002,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::NotAuthenticated => "Not logged in",
            Self::InvalidCredentials => "Wrong password for Admin",
            Self::AdminRequired => "Admin session required",
            Self::OrderNotFound => "Order not found",
            Self::RecipeNotFound => "Recipe not found",
            Self::InvalidPrice => "Price must be positive",
            Self::EmptyRecipeName => "Recipe name must not be empty",
            Self::RemoteUnavailable => "Remote store unavailable",
            Self::InternalError => "Internal error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a `u16` does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            2003 => Ok(ErrorCode::AdminRequired),
            4001 => Ok(ErrorCode::OrderNotFound),
            6001 => Ok(ErrorCode::RecipeNotFound),
            6002 => Ok(ErrorCode::InvalidPrice),
            6003 => Ok(ErrorCode::EmptyRecipeName),
            9001 => Ok(ErrorCode::RemoteUnavailable),
            9002 => Ok(ErrorCode::InternalError),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
