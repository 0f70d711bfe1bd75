//! Error system for the Wagon ordering system
//!
//! - [`ErrorCode`]: stable numeric codes
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code + message + optional details
//!
//! Three families matter to callers: validation failures (bad price or
//! name, no state change), unknown entities (missing recipe or order, the
//! operation is a no-op) and remote failures. Remote failures never cross
//! the store client boundary as errors; they only show up here when an
//! operation must report that its write did not land.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::validation("Fill in all fields").with_detail("field", "name");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
