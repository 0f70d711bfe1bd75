//! Change events published to the UI
//!
//! The UI never gets called from the poller's task. It subscribes to the
//! [`EventBus`] and drains events on its own schedule; every event carries a
//! full snapshot, so a subscriber that lags and misses some only needs the
//! latest one.

use crate::cache::Menu;
use crate::orders::ClosedOrder;
use shared::models::Order;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Full pending-order snapshot after a pull
    OrdersChanged(Arc<Vec<Order>>),
    /// Full online-user snapshot after a pull
    PresenceChanged(Arc<Vec<String>>),
    /// An order left the active set through this client
    OrderClosed(ClosedOrder),
    /// Menu replaced or edited
    MenuChanged(Arc<Menu>),
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers; dropped when nobody listens
    pub fn publish(&self, event: SyncEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No event subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(SyncEvent::PresenceChanged(Arc::new(vec!["alice".into()])));

        match rx.recv().await.unwrap() {
            SyncEvent::PresenceChanged(users) => assert_eq!(*users, vec!["alice".to_string()]),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(SyncEvent::OrdersChanged(Arc::new(Vec::new())));
    }
}
