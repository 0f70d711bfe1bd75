//! Wagon Engine - ordering core of the chuck wagon kitchen app
//!
//! # Overview
//!
//! - **State cache** (`cache`): menu, active orders, online users, session
//! - **Sync loop** (`sync`): polls the remote store, publishes change events
//! - **Orders** (`orders`): submission, completion, cancellation, menu edits
//! - **Engine** (`engine`): one connected session wiring all of the above
//!
//! # Layout
//!
//! ```text
//! wagon-engine/src/
//! ├── core/      # configuration, background tasks
//! ├── cache/     # local state cache, default menu
//! ├── sync/      # sync worker, codecs, event bus
//! ├── orders/    # order lifecycle, menu editor
//! ├── notify.rs  # notification sinks
//! ├── engine.rs  # session facade
//! └── utils/     # logger
//! ```

pub mod cache;
pub mod core;
pub mod engine;
pub mod notify;
pub mod orders;
pub mod sync;
pub mod utils;

pub use cache::{Menu, StateCache};
pub use core::{BackgroundTasks, Config};
pub use engine::Engine;
pub use notify::{ChannelNotifier, FanoutNotifier, HistoryNotifier, Notifier, TracingNotifier};
pub use orders::{ClosedOrder, MenuEditor, OrderLifecycle, Submission};
pub use sync::{EventBus, SyncError, SyncEvent, SyncSettings, SyncWorker};
pub use utils::logger::{init_logger, init_logger_with_file};

pub use shared::error::{AppError, AppResult, ErrorCode};

/// Load `.env` and start the logger from `LOG_LEVEL` / `LOG_DIR`
pub fn setup_environment() -> anyhow::Result<Config> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {e}"));
    }

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(store_url = %config.store_url, "Environment ready");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_environment_without_dotenv_file() {
        assert!(dotenv::dotenv().is_err_and(|e| e.not_found()));

        let config = setup_environment().unwrap();
        assert!(!config.store_url.is_empty());
        assert!(!config.poll_interval().is_zero());
        // Logger init is idempotent
        assert!(setup_environment().is_ok());
    }
}
