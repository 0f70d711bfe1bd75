//! Session Model

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// The single admin identity
pub const ADMIN_USERNAME: &str = "Admin";

/// Current session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub is_admin: bool,
}

impl Session {
    /// Validate a login attempt
    ///
    /// Any non-empty name is accepted as a customer. `Admin` additionally
    /// requires the shared admin password.
    pub fn login(username: &str, password: &str, admin_password: &str) -> AppResult<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Enter a user name"));
        }

        if username == ADMIN_USERNAME {
            if password.trim() != admin_password {
                return Err(AppError::invalid_credentials());
            }
            return Ok(Self::admin());
        }

        Ok(Self::customer(username))
    }

    pub fn customer(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            username: ADMIN_USERNAME.to_string(),
            is_admin: true,
        }
    }
}
