//! SyncWorker - background poller mirroring the remote store into the cache
//!
//! Each tick pulls the order and presence collections, pushes the caller's
//! heartbeat and drains the caller's notification queue. A faulted or
//! panicking tick is logged and followed by an extra backoff sleep; only
//! the shutdown token ends the loop.

use futures::FutureExt;
use serde_json::json;
use shared::message::{Notification, NotificationCategory};
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use wagon_client::{RemoteStore, paths};

use super::codec;
use super::events::{EventBus, SyncEvent};
use super::SyncError;
use crate::cache::StateCache;
use crate::core::Config;
use crate::core::tasks::panic_message;
use crate::notify::Notifier;

/// Ids remembered to avoid re-delivering a notification whose remote
/// delete failed
const MAX_DELIVERED_IDS: usize = 512;

/// Floor for the poll period; a zero period would stall the ticker
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timing knobs of the loop
#[derive(Debug, Clone, Copy)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    pub error_backoff: Duration,
    pub presence_timeout_secs: i64,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval().max(MIN_POLL_INTERVAL),
            error_backoff: config.error_backoff(),
            presence_timeout_secs: config.presence_timeout_secs,
        }
    }
}

/// What a single tick observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pending orders applied to the cache (None = nothing applied)
    pub orders: Option<usize>,
    /// Online users applied to the cache (None = nothing applied)
    pub online: Option<usize>,
    pub heartbeat: bool,
    pub delivered: usize,
}

pub struct SyncWorker {
    store: Arc<dyn RemoteStore>,
    cache: Arc<StateCache>,
    events: EventBus,
    notifier: Arc<dyn Notifier>,
    settings: SyncSettings,
    shutdown: CancellationToken,
    /// Pending count seen by the previous tick (admin new-order alert)
    last_pending: Option<usize>,
    delivered: HashSet<String>,
}

impl SyncWorker {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        cache: Arc<StateCache>,
        events: EventBus,
        notifier: Arc<dyn Notifier>,
        settings: SyncSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            cache,
            events,
            notifier,
            settings,
            shutdown,
            last_pending: None,
            delivered: HashSet::new(),
        }
    }

    /// Run until the shutdown token fires, then drop the caller's presence
    /// entry
    ///
    /// The first tick comes one period after the call; callers wanting an
    /// immediate pull run [`tick`](Self::tick) themselves before spawning.
    pub async fn run(mut self) {
        tracing::info!(
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            "SyncWorker started"
        );

        let period = self.settings.poll_interval.max(MIN_POLL_INTERVAL);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let faulted = match AssertUnwindSafe(self.tick()).catch_unwind().await {
                Ok(Ok(report)) => {
                    tracing::debug!(?report, "Sync tick done");
                    false
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Sync tick failed");
                    true
                }
                Err(panic_info) => {
                    tracing::error!(
                        panic = %panic_message(panic_info.as_ref()),
                        "Sync tick panicked"
                    );
                    true
                }
            };

            if faulted && !self.backoff().await {
                break;
            }
        }

        self.leave().await;
        tracing::info!("SyncWorker stopped");
    }

    /// Sleep for the error backoff; false when shutdown fired meanwhile
    async fn backoff(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.settings.error_backoff) => true,
        }
    }

    /// Best-effort removal of the caller's presence entry
    async fn leave(&self) {
        if let Some(user) = self.cache.current_user()
            && !self.store.delete(&paths::presence(&user)).await
        {
            tracing::warn!(user = %user, "Could not remove presence entry");
        }
    }

    /// One synchronization pass
    ///
    /// Steps run in order; a decode fault aborts the rest of the pass.
    pub async fn tick(&mut self) -> Result<TickReport, SyncError> {
        let orders = self.pull_orders().await?;
        let online = self.pull_presence().await?;
        let heartbeat = self.push_heartbeat().await;
        let delivered = self.drain_notifications().await?;
        Ok(TickReport {
            orders,
            online,
            heartbeat,
            delivered,
        })
    }

    async fn pull_orders(&mut self) -> Result<Option<usize>, SyncError> {
        // Absent and unreachable look the same; neither moves the alert baseline
        let Some(value) = self.store.read(paths::ORDERS).await else {
            return Ok(None);
        };
        let pending: Vec<_> = codec::decode_orders(value)?
            .into_iter()
            .filter(|o| o.is_pending())
            .collect();
        let count = pending.len();

        // Orders closed locally shrink the baseline
        let previous = self
            .last_pending
            .map(|seen| seen.min(self.cache.orders().len()));
        if self.cache.is_admin()
            && let Some(previous) = previous
            && count > previous
        {
            self.notifier.notify(Notification::info(
                NotificationCategory::Order,
                "New order",
                "A new order has arrived",
            ));
        }
        self.last_pending = Some(count);

        if pending.is_empty() {
            return Ok(None);
        }
        self.cache.sync_orders(pending);
        self.events.publish(SyncEvent::OrdersChanged(self.cache.orders()));
        Ok(Some(count))
    }

    async fn pull_presence(&self) -> Result<Option<usize>, SyncError> {
        let Some(value) = self.store.read(paths::ONLINE_USERS).await else {
            return Ok(None);
        };
        let online = codec::decode_online_users(
            value,
            shared::util::now_secs(),
            self.settings.presence_timeout_secs,
        )?;
        if online.is_empty() {
            return Ok(None);
        }
        let count = online.len();
        self.cache.update_online_users(online);
        self.events
            .publish(SyncEvent::PresenceChanged(self.cache.online_users()));
        Ok(Some(count))
    }

    async fn push_heartbeat(&self) -> bool {
        let Some(user) = self.cache.current_user() else {
            return false;
        };
        self.store
            .write(&paths::last_seen(&user), &json!(shared::util::now_secs()))
            .await
    }

    /// Deliver then delete each queued notification
    async fn drain_notifications(&mut self) -> Result<usize, SyncError> {
        let Some(user) = self.cache.current_user() else {
            return Ok(0);
        };
        let Some(value) = self.store.read(&paths::notifications(&user)).await else {
            return Ok(0);
        };

        let mut delivered = 0;
        for (key, notification) in codec::decode_notifications(value)? {
            if self.delivered.insert(notification.id.clone()) {
                tracing::debug!(id = %notification.id, "Delivering queued notification");
                self.notifier.notify(notification);
                delivered += 1;
            }
            if !self.store.delete(&paths::notification(&user, &key)).await {
                tracing::warn!(key = %key, "Could not delete delivered notification");
            }
        }

        if self.delivered.len() > MAX_DELIVERED_IDS {
            self.delivered.clear();
        }
        Ok(delivered)
    }
}
