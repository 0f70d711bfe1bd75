//! Local State Cache
//!
//! In-process mirror of the menu, the active orders, the online users and
//! the current session. Collections are published as `Arc` snapshots:
//! every writer builds the replacement off to the side and swaps it in
//! under a short write lock, so a reader either sees the old collection or
//! the new one and never a half-applied edit.
//!
//! The cache does not validate its inputs. Price and name checks belong to
//! [`MenuEditor`](crate::orders::MenuEditor), the only caller that edits
//! recipes.

mod defaults;

pub use defaults::default_menu;

use parking_lot::{Mutex, RwLock};
use shared::message::Notification;
use shared::models::{ADMIN_USERNAME, Order, Recipe, Session};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Menu keyed by recipe id
pub type Menu = BTreeMap<i64, Recipe>;

/// Notification history is trimmed to this many entries
const MAX_NOTIFICATION_HISTORY: usize = 200;

pub struct StateCache {
    menu: RwLock<Arc<Menu>>,
    orders: RwLock<Arc<Vec<Order>>>,
    online_users: RwLock<Arc<Vec<String>>>,
    session: RwLock<Option<Session>>,
    notifications: Mutex<Vec<Notification>>,
    /// Last order id handed out by this process
    last_order_id: AtomicI64,
}

impl std::fmt::Debug for StateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCache")
            .field("menu_count", &self.menu.read().len())
            .field("orders_count", &self.orders.read().len())
            .field("online_count", &self.online_users.read().len())
            .field("session", &*self.session.read())
            .finish()
    }
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCache {
    /// Cache seeded with the default menu
    pub fn new() -> Self {
        Self::with_menu(default_menu())
    }

    /// Cache seeded with `menu`
    pub fn with_menu(menu: Menu) -> Self {
        Self {
            menu: RwLock::new(Arc::new(menu)),
            orders: RwLock::new(Arc::new(Vec::new())),
            online_users: RwLock::new(Arc::new(Vec::new())),
            session: RwLock::new(None),
            notifications: Mutex::new(Vec::new()),
            last_order_id: AtomicI64::new(0),
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Current menu snapshot
    pub fn menu(&self) -> Arc<Menu> {
        self.menu.read().clone()
    }

    pub fn recipe(&self, recipe_id: i64) -> Option<Recipe> {
        self.menu.read().get(&recipe_id).cloned()
    }

    /// Add a recipe under `max(id) + 1` (1 for an empty menu)
    pub fn add_recipe(&self, name: &str, price: i64) -> i64 {
        let mut guard = self.menu.write();
        let mut menu = Menu::clone(&guard);
        let id = menu.keys().next_back().map_or(1, |max| max + 1);
        menu.insert(id, Recipe::new(id, name, price));
        *guard = Arc::new(menu);
        id
    }

    /// Replace name and price of an existing recipe
    pub fn update_recipe(&self, recipe_id: i64, name: &str, price: i64) -> bool {
        let mut guard = self.menu.write();
        if !guard.contains_key(&recipe_id) {
            return false;
        }
        let mut menu = Menu::clone(&guard);
        menu.insert(recipe_id, Recipe::new(recipe_id, name, price));
        *guard = Arc::new(menu);
        true
    }

    pub fn remove_recipe(&self, recipe_id: i64) -> bool {
        let mut guard = self.menu.write();
        if !guard.contains_key(&recipe_id) {
            return false;
        }
        let mut menu = Menu::clone(&guard);
        menu.remove(&recipe_id);
        *guard = Arc::new(menu);
        true
    }

    /// Wholesale menu replacement
    pub fn replace_menu(&self, menu: Menu) {
        *self.menu.write() = Arc::new(menu);
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Current order snapshot
    pub fn orders(&self) -> Arc<Vec<Order>> {
        self.orders.read().clone()
    }

    pub fn order_by_id(&self, order_id: i64) -> Option<Order> {
        self.orders.read().iter().find(|o| o.id == order_id).cloned()
    }

    /// Create a pending order snapshotting the recipe's current name and
    /// price; `None` when the recipe is not on the menu
    pub fn add_order(&self, recipe_id: i64, customer: &str) -> Option<Order> {
        let recipe = self.recipe(recipe_id)?;
        let order = Order::new(self.next_order_id(), &recipe, customer);

        let mut guard = self.orders.write();
        let mut orders = Vec::clone(&guard);
        orders.push(order.clone());
        *guard = Arc::new(orders);
        Some(order)
    }

    /// Drop an order; absent ids are a no-op
    pub fn remove_order(&self, order_id: i64) -> bool {
        let mut guard = self.orders.write();
        if guard.iter().any(|o| o.id == order_id) {
            let orders = guard.iter().filter(|o| o.id != order_id).cloned().collect();
            *guard = Arc::new(orders);
        }
        true
    }

    /// Wholesale replace with the remote order set
    ///
    /// Last writer wins: a local order whose remote write has not been
    /// observed yet disappears until a later pull brings it back.
    pub fn sync_orders(&self, orders: Vec<Order>) {
        *self.orders.write() = Arc::new(orders);
    }

    /// Pending orders of one customer
    pub fn active_orders_for_user(&self, username: &str) -> Vec<Order> {
        self.orders
            .read()
            .iter()
            .filter(|o| o.is_pending() && o.customer == username)
            .cloned()
            .collect()
    }

    /// Every pending order (admin view)
    pub fn all_active_orders(&self) -> Vec<Order> {
        self.orders.read().iter().filter(|o| o.is_pending()).cloned().collect()
    }

    /// Millisecond timestamp, bumped past the previous id when the clock
    /// has not moved
    fn next_order_id(&self) -> i64 {
        let now = shared::util::now_millis();
        let previous = self
            .last_order_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1)
    }

    // =========================================================================
    // Presence
    // =========================================================================

    /// Wholesale replace of the online list
    pub fn update_online_users(&self, users: Vec<String>) {
        *self.online_users.write() = Arc::new(users);
    }

    pub fn online_users(&self) -> Arc<Vec<String>> {
        self.online_users.read().clone()
    }

    /// Online users other than the admin
    pub fn online_customers(&self) -> Vec<String> {
        self.online_users
            .read()
            .iter()
            .filter(|u| u.as_str() != ADMIN_USERNAME)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn set_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn current_user(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.username.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.session.read().as_ref().is_some_and(|s| s.is_admin)
    }

    pub fn clear_session(&self) {
        *self.session.write() = None;
    }

    // =========================================================================
    // Notification history
    // =========================================================================

    pub fn add_notification(&self, notification: Notification) {
        let mut history = self.notifications.lock();
        history.push(notification);
        if history.len() > MAX_NOTIFICATION_HISTORY {
            let excess = history.len() - MAX_NOTIFICATION_HISTORY;
            history.drain(..excess);
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn clear_notifications(&self) {
        self.notifications.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::NotificationCategory;
    use shared::models::OrderStatus;

    fn soup_menu() -> Menu {
        let mut menu = Menu::new();
        menu.insert(1, Recipe::new(1, "Soup", 10));
        menu
    }

    #[test]
    fn test_add_recipe_uses_max_plus_one() {
        let cache = StateCache::with_menu(Menu::new());
        assert_eq!(cache.add_recipe("Bread", 5), 1);
        assert_eq!(cache.add_recipe("Soup", 10), 2);
        cache.remove_recipe(1);
        assert_eq!(cache.add_recipe("Stew", 12), 3);
        assert_eq!(cache.recipe(3).unwrap().name, "Stew");
    }

    #[test]
    fn test_add_recipe_on_default_menu() {
        let cache = StateCache::new();
        let id = cache.add_recipe("Coffee", 10);
        assert_eq!(id, 17);
        assert_eq!(cache.recipe(id), Some(Recipe::new(17, "Coffee", 10)));
    }

    #[test]
    fn test_add_then_remove_restores_menu() {
        let cache = StateCache::new();
        let before = cache.menu();
        let id = cache.add_recipe("Bread", 5);
        assert!(cache.remove_recipe(id));
        assert_eq!(*cache.menu(), *before);
    }

    #[test]
    fn test_update_and_remove_unknown_recipe() {
        let cache = StateCache::with_menu(soup_menu());
        assert!(!cache.update_recipe(99, "Nope", 1));
        assert!(!cache.remove_recipe(99));
        assert!(cache.update_recipe(1, "Broth", 12));
        assert_eq!(cache.recipe(1).unwrap().price, 12);
    }

    #[test]
    fn test_menu_snapshot_is_stable_across_edits() {
        let cache = StateCache::with_menu(soup_menu());
        let snapshot = cache.menu();
        cache.add_recipe("Bread", 5);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(cache.menu().len(), 2);
    }

    #[test]
    fn test_add_order_unknown_recipe() {
        let cache = StateCache::with_menu(soup_menu());
        assert!(cache.add_order(42, "alice").is_none());
        assert!(cache.orders().is_empty());
    }

    #[test]
    fn test_order_snapshot_survives_recipe_update() {
        let cache = StateCache::with_menu(soup_menu());
        let order = cache.add_order(1, "alice").unwrap();
        cache.update_recipe(1, "Broth", 99);

        let stored = cache.order_by_id(order.id).unwrap();
        assert_eq!(stored.recipe_name, "Soup");
        assert_eq!(stored.price, 10);
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[test]
    fn test_order_ids_strictly_increase() {
        let cache = StateCache::with_menu(soup_menu());
        let ids: Vec<i64> = (0..50).map(|_| cache.add_order(1, "alice").unwrap().id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_remove_order_is_idempotent() {
        let cache = StateCache::with_menu(soup_menu());
        let order = cache.add_order(1, "alice").unwrap();
        assert!(cache.remove_order(order.id));
        assert!(cache.remove_order(order.id));
        assert!(cache.orders().is_empty());
    }

    #[test]
    fn test_sync_orders_replaces_not_merges() {
        let cache = StateCache::with_menu(soup_menu());
        cache.add_order(1, "alice").unwrap();
        cache.sync_orders(Vec::new());
        assert!(cache.orders().is_empty());

        let recipe = Recipe::new(1, "Soup", 10);
        let remote = vec![Order::new(1, &recipe, "bob"), Order::new(2, &recipe, "carol")];
        cache.sync_orders(remote.clone());
        assert_eq!(*cache.orders(), remote);
    }

    #[test]
    fn test_active_orders_views() {
        let cache = StateCache::with_menu(soup_menu());
        cache.add_order(1, "alice").unwrap();
        cache.add_order(1, "bob").unwrap();
        cache.add_order(1, "alice").unwrap();

        assert_eq!(cache.active_orders_for_user("alice").len(), 2);
        assert_eq!(cache.active_orders_for_user("nobody").len(), 0);
        assert_eq!(cache.all_active_orders().len(), 3);
    }

    #[test]
    fn test_online_customers_excludes_admin() {
        let cache = StateCache::new();
        cache.update_online_users(vec!["Admin".into(), "alice".into()]);
        assert_eq!(cache.online_users().len(), 2);
        assert_eq!(cache.online_customers(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_session_lifecycle() {
        let cache = StateCache::new();
        assert!(cache.session().is_none());
        assert!(!cache.is_admin());

        cache.set_session(Session::admin());
        assert!(cache.is_admin());
        assert_eq!(cache.current_user().as_deref(), Some("Admin"));

        cache.clear_session();
        assert!(cache.current_user().is_none());
    }

    #[test]
    fn test_notification_history_is_bounded() {
        let cache = StateCache::new();
        for i in 0..(MAX_NOTIFICATION_HISTORY + 5) {
            cache.add_notification(Notification::info(
                NotificationCategory::System,
                "n",
                i.to_string(),
            ));
        }
        let history = cache.notifications();
        assert_eq!(history.len(), MAX_NOTIFICATION_HISTORY);
        assert_eq!(history[0].message, "5");

        cache.clear_notifications();
        assert!(cache.notifications().is_empty());
    }
}
