//! Order lifecycle
//!
//! `Pending --complete--> removed` and `Pending --cancel--> removed`. The
//! remote record is deleted either way; the terminal status survives only
//! in the returned [`ClosedOrder`], the [`SyncEvent::OrderClosed`] event and
//! the customer's notification.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{AppError, AppResult};
use shared::message::{Notification, NotificationCategory};
use shared::models::{Order, OrderStatus};
use std::sync::Arc;
use wagon_client::{RemoteStore, paths, write_json};

use crate::cache::StateCache;
use crate::notify::Notifier;
use crate::sync::{EventBus, SyncEvent};

/// Outcome of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub order: Order,
    /// False when the remote push failed; the order then exists only in
    /// this client's cache until the next pull drops it
    pub delivered: bool,
}

/// An order that left the active set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedOrder {
    pub order: Order,
    pub status: OrderStatus,
}

pub struct OrderLifecycle {
    store: Arc<dyn RemoteStore>,
    cache: Arc<StateCache>,
    events: EventBus,
    notifier: Arc<dyn Notifier>,
}

impl OrderLifecycle {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        cache: Arc<StateCache>,
        events: EventBus,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            cache,
            events,
            notifier,
        }
    }

    fn reject<T>(&self, err: AppError) -> AppResult<T> {
        tracing::debug!(code = %err.code, "{}", err.message);
        self.notifier.notify(Notification::from(&err));
        Err(err)
    }

    /// Submit an order for the logged-in user
    pub async fn submit_order(&self, recipe_id: i64) -> AppResult<Submission> {
        let Some(user) = self.cache.current_user() else {
            return self.reject(AppError::not_authenticated());
        };
        self.submit_order_as(recipe_id, &user).await
    }

    /// Submit an order on behalf of `customer`
    pub async fn submit_order_as(&self, recipe_id: i64, customer: &str) -> AppResult<Submission> {
        let Some(order) = self.cache.add_order(recipe_id, customer) else {
            return self.reject(AppError::unknown_recipe(recipe_id));
        };

        let delivered = write_json(self.store.as_ref(), &paths::order(order.id), &order).await;
        if delivered {
            tracing::info!(order_id = order.id, recipe = %order.recipe_name, customer = %customer, "Order submitted");
            self.notifier.notify(Notification::success(
                NotificationCategory::Order,
                "Order sent",
                format!("Order '{}' sent to the kitchen", order.recipe_name),
            ));
        } else {
            tracing::warn!(order_id = order.id, "Order kept locally, remote push failed");
            self.notifier.notify(Notification::error(
                NotificationCategory::Order,
                "Error",
                "Could not send the order",
            ));
        }

        Ok(Submission { order, delivered })
    }

    /// Admin: the order is ready
    pub async fn complete_order(&self, order_id: i64) -> AppResult<ClosedOrder> {
        self.close(order_id, OrderStatus::Completed).await
    }

    /// Admin: the order is withdrawn
    pub async fn cancel_order(&self, order_id: i64) -> AppResult<ClosedOrder> {
        self.close(order_id, OrderStatus::Cancelled).await
    }

    async fn close(&self, order_id: i64, status: OrderStatus) -> AppResult<ClosedOrder> {
        if !self.cache.is_admin() {
            return self.reject(AppError::admin_required());
        }
        let Some(mut order) = self.cache.order_by_id(order_id).filter(Order::is_pending) else {
            return self.reject(AppError::unknown_order(order_id));
        };

        self.cache.remove_order(order_id);
        if !self.store.delete(&paths::order(order_id)).await {
            // The next pull brings the record back while it is still remote
            tracing::warn!(order_id, "Remote delete of closed order failed");
        }
        order.status = status;
        tracing::info!(order_id, customer = %order.customer, status = %status, "Order closed");

        let notification = customer_notice(&order);
        self.notifier.notify(notification.clone());
        self.forward(&order.customer, &notification).await;

        let closed = ClosedOrder { order, status };
        self.events.publish(SyncEvent::OrderClosed(closed.clone()));
        Ok(closed)
    }

    /// Queue `notification` in the customer's remote inbox; their own sync
    /// loop delivers it
    async fn forward(&self, customer: &str, notification: &Notification) {
        if self.cache.current_user().as_deref() == Some(customer) {
            return;
        }
        let path = paths::notification(customer, &notification.id);
        if !self.store.write(&path, &json!(notification)).await {
            tracing::warn!(customer = %customer, "Could not forward notification to customer");
        }
    }

    /// Pending orders of one customer
    pub fn active_orders_for_user(&self, username: &str) -> Vec<Order> {
        self.cache.active_orders_for_user(username)
    }

    /// Every pending order
    pub fn all_active_orders(&self) -> Vec<Order> {
        self.cache.all_active_orders()
    }
}

fn customer_notice(order: &Order) -> Notification {
    let notification = match order.status {
        OrderStatus::Cancelled => Notification::warning(
            NotificationCategory::Order,
            "Order cancelled",
            format!("Order '{}' was cancelled by the administrator", order.recipe_name),
        ),
        _ => Notification::success(
            NotificationCategory::Order,
            "Order ready",
            format!("Your order '{}' is ready for pickup", order.recipe_name),
        ),
    };
    notification.to_recipient(order.customer.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Menu;
    use crate::notify::ChannelNotifier;
    use shared::error::ErrorCode;
    use shared::message::NotificationLevel;
    use shared::models::{Recipe, Session};
    use tokio::sync::mpsc::UnboundedReceiver;
    use wagon_client::MemoryStore;

    fn setup(session: Session) -> (OrderLifecycle, Arc<MemoryStore>, Arc<StateCache>, UnboundedReceiver<Notification>) {
        let store = Arc::new(MemoryStore::new());
        let mut menu = Menu::new();
        menu.insert(1, Recipe::new(1, "Soup", 10));
        let cache = Arc::new(StateCache::with_menu(menu));
        cache.set_session(session);
        let (notifier, rx) = ChannelNotifier::new();
        let lifecycle = OrderLifecycle::new(store.clone(), cache.clone(), EventBus::new(), Arc::new(notifier));
        (lifecycle, store, cache, rx)
    }

    #[tokio::test]
    async fn test_submit_pushes_to_store() {
        let (lifecycle, store, _cache, mut rx) = setup(Session::customer("alice"));

        let submission = lifecycle.submit_order(1).await.unwrap();

        assert!(submission.delivered);
        assert_eq!(submission.order.recipe_name, "Soup");
        assert_eq!(submission.order.price, 10);
        assert_eq!(submission.order.status, OrderStatus::Pending);
        let remote = store.get(&paths::order(submission.order.id)).unwrap();
        assert_eq!(remote["customer"], "alice");
        assert_eq!(rx.try_recv().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_unknown_recipe_rejected_without_mutation() {
        let (lifecycle, store, cache, mut rx) = setup(Session::customer("alice"));

        let err = lifecycle.submit_order(42).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::RecipeNotFound);
        assert!(cache.orders().is_empty());
        assert_eq!(store.write_count(), 0);
        assert_eq!(rx.try_recv().unwrap().level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_failed_push_keeps_local_order() {
        let (lifecycle, store, cache, mut rx) = setup(Session::customer("alice"));
        store.set_offline(true);

        let submission = lifecycle.submit_order(1).await.unwrap();

        assert!(!submission.delivered);
        assert_eq!(cache.active_orders_for_user("alice"), vec![submission.order]);
        assert_eq!(rx.try_recv().unwrap().message, "Could not send the order");
    }

    #[tokio::test]
    async fn test_close_requires_admin() {
        let (lifecycle, _store, cache, _rx) = setup(Session::customer("alice"));
        let order = lifecycle.submit_order(1).await.unwrap().order;

        let err = lifecycle.complete_order(order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(cache.all_active_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_forwards_notice_to_customer() {
        let (lifecycle, store, cache, mut rx) = setup(Session::admin());
        let order = lifecycle.submit_order_as(1, "alice").await.unwrap().order;
        let _ = rx.try_recv();

        let closed = lifecycle.cancel_order(order.id).await.unwrap();

        assert_eq!(closed.status, OrderStatus::Cancelled);
        assert_eq!(closed.order.status, OrderStatus::Cancelled);
        assert!(cache.all_active_orders().is_empty());
        assert!(store.get(&paths::order(order.id)).is_none());

        let local = rx.try_recv().unwrap();
        assert_eq!(local.title, "Order cancelled");
        assert_eq!(local.recipient.as_deref(), Some("alice"));
        let queued = store.get(&paths::notification("alice", &local.id)).unwrap();
        assert_eq!(queued["title"], "Order cancelled");
    }

    #[tokio::test]
    async fn test_close_unknown_order() {
        let (lifecycle, store, _cache, _rx) = setup(Session::admin());
        let err = lifecycle.complete_order(7).await.unwrap_err();
        assert!(err.is_unknown_entity());
        assert_eq!(store.delete_count(), 0);
    }

    #[tokio::test]
    async fn test_admin_own_order_not_forwarded() {
        let (lifecycle, store, _cache, _rx) = setup(Session::admin());
        let order = lifecycle.submit_order(1).await.unwrap().order;

        lifecycle.complete_order(order.id).await.unwrap();

        assert!(store.get(&paths::notifications(shared::models::ADMIN_USERNAME)).is_none());
    }
}
