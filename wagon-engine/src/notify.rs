//! Notification sinks
//!
//! The engine reports every lifecycle event and every rejected action
//! through a [`Notifier`]. Delivery is fire-and-forget: the engine never
//! waits on a sink and never learns whether the user saw anything.

use crate::cache::StateCache;
use shared::message::{Notification, NotificationLevel};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Notification collaborator
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error => {
                tracing::error!(title = %n.title, recipient = ?n.recipient, "{}", n.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!(title = %n.title, recipient = ?n.recipient, "{}", n.message)
            }
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!(title = %n.title, recipient = ?n.recipient, "{}", n.message)
            }
        }
    }
}

/// Queues notifications for the UI to drain on its own schedule
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the UI is closing; nothing left to tell
        let _ = self.tx.send(notification);
    }
}

/// Sends every notification to several sinks
#[derive(Clone, Default)]
pub struct FanoutNotifier {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn Notifier>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: Notification) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.notify(notification.clone());
            }
            last.notify(notification);
        }
    }
}

/// Records every notification in the cache history before passing it on
pub struct HistoryNotifier {
    cache: Arc<StateCache>,
    inner: Arc<dyn Notifier>,
}

impl HistoryNotifier {
    pub fn new(cache: Arc<StateCache>, inner: Arc<dyn Notifier>) -> Self {
        Self { cache, inner }
    }
}

impl Notifier for HistoryNotifier {
    fn notify(&self, notification: Notification) {
        self.cache.add_notification(notification.clone());
        self.inner.notify(notification);
    }
}
