//! Wagon Client - remote document store client
//!
//! Thin request/response wrapper around a path-addressed JSON document
//! store. Every call is one round trip; failures are logged and degraded to
//! "no data" (`None` / `false`) so callers never see a transport error.

pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "in-process")]
pub mod memory;
pub mod store;

pub use config::StoreConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpStore;
#[cfg(feature = "in-process")]
pub use memory::MemoryStore;
pub use store::{RemoteStore, paths, read_json, write_json};
