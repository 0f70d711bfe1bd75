//! Engine - one connected session
//!
//! Wires the store, the cache, the sync worker and the order/menu services
//! together for a logged-in user.
//!
//! ```ignore
//! let engine = Engine::connect_http(config, notifier, "alice", "").await?;
//! let mut events = engine.subscribe();
//! engine.orders().submit_order(1).await?;
//! engine.disconnect().await;
//! ```

use shared::error::{AppError, AppResult};
use shared::message::{Notification, NotificationCategory};
use shared::models::{PresenceEntry, Session};
use std::sync::Arc;
use tokio::sync::broadcast;
use wagon_client::{RemoteStore, paths, read_json, write_json};

use crate::cache::StateCache;
use crate::core::{BackgroundTasks, Config};
use crate::notify::{HistoryNotifier, Notifier};
use crate::orders::{MenuEditor, OrderLifecycle};
use crate::sync::{EventBus, SyncEvent, SyncSettings, SyncWorker};

pub struct Engine {
    config: Config,
    store: Arc<dyn RemoteStore>,
    cache: Arc<StateCache>,
    events: EventBus,
    orders: OrderLifecycle,
    menu: MenuEditor,
    tasks: Option<BackgroundTasks>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cache", &self.cache)
            .field("running", &self.tasks.is_some())
            .finish()
    }
}

impl Engine {
    /// Connect against the HTTP store named by `config`
    pub async fn connect_http(
        config: Config,
        notifier: Arc<dyn Notifier>,
        username: &str,
        password: &str,
    ) -> AppResult<Self> {
        let store = match config.store_config().build_http_store() {
            Ok(store) => store,
            Err(e) => {
                let err = AppError::remote_unavailable(format!("Could not connect: {e}"));
                notifier.notify(Notification::from(&err));
                return Err(err);
            }
        };
        Self::connect(config, Arc::new(store), notifier, username, password).await
    }

    /// Log in, announce presence, load the menu, pull once and start the
    /// sync loop
    pub async fn connect(
        config: Config,
        store: Arc<dyn RemoteStore>,
        notifier: Arc<dyn Notifier>,
        username: &str,
        password: &str,
    ) -> AppResult<Self> {
        let session = match Session::login(username, password, &config.admin_password) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(username = %username.trim(), code = %e.code, "Login rejected");
                notifier.notify(Notification::from(&e));
                return Err(e);
            }
        };
        let user = session.username.clone();

        let cache = Arc::new(StateCache::new());
        cache.set_session(session);
        let notifier: Arc<dyn Notifier> = Arc::new(HistoryNotifier::new(cache.clone(), notifier));
        let events = EventBus::new();

        // A reconnect inside the online window keeps the original join time
        let presence_path = paths::presence(&user);
        let mut entry = PresenceEntry::joining(&user);
        if let Some(previous) = read_json::<PresenceEntry>(store.as_ref(), &presence_path).await
            && previous.is_online(entry.last_seen, config.presence_timeout_secs)
        {
            entry.joined = previous.joined;
        }
        if !write_json(store.as_ref(), &presence_path, &entry).await {
            tracing::warn!(user = %user, "Could not announce presence");
        }

        let menu = MenuEditor::new(store.clone(), cache.clone(), events.clone(), notifier.clone());
        menu.load_menu().await;

        let mut tasks = BackgroundTasks::new();
        let mut worker = SyncWorker::new(
            store.clone(),
            cache.clone(),
            events.clone(),
            notifier.clone(),
            SyncSettings::from_config(&config),
            tasks.shutdown_token(),
        );
        if let Err(e) = worker.tick().await {
            tracing::error!(error = %e, "Initial sync failed");
        }
        tasks.spawn("sync_worker", worker.run());

        let orders = OrderLifecycle::new(store.clone(), cache.clone(), events.clone(), notifier.clone());

        tracing::info!(user = %user, admin = cache.is_admin(), "Connected");
        notifier.notify(Notification::success(NotificationCategory::System, "Success", "Connected!"));

        Ok(Self {
            config,
            store,
            cache,
            events,
            orders,
            menu,
            tasks: Some(tasks),
        })
    }

    /// Save the menu (admin), stop the sync loop and end the session
    ///
    /// The sync loop removes the presence entry on its way out.
    pub async fn disconnect(mut self) {
        if self.cache.is_admin() && !self.menu.save_menu().await {
            tracing::warn!("Menu not saved on disconnect");
        }
        if let Some(tasks) = self.tasks.take() {
            tasks.shutdown(self.config.shutdown_timeout()).await;
        }
        let user = self.cache.current_user();
        self.cache.clear_session();
        tracing::info!(user = ?user, "Disconnected");
    }

    pub fn orders(&self) -> &OrderLifecycle {
        &self.orders
    }

    pub fn menu(&self) -> &MenuEditor {
        &self.menu
    }

    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub fn session(&self) -> Option<Session> {
        self.cache.session()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// False once the sync loop died on its own
    pub fn is_syncing(&self) -> bool {
        self.tasks.as_ref().is_some_and(|t| t.check_health() == 0)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(tasks) = &self.tasks {
            tracing::debug!("Engine dropped without disconnect, cancelling tasks");
            tasks.shutdown_token().cancel();
        }
    }
}
