use shared::error::{AppError, AppResult};
use shared::message::{Notification, NotificationCategory};
use shared::models::Recipe;
use std::sync::Arc;
use wagon_client::{RemoteStore, paths};

use crate::cache::{Menu, StateCache, default_menu};
use crate::notify::Notifier;
use crate::sync::codec::{decode_menu, encode_menu};
use crate::sync::{EventBus, SyncEvent};

/// Admin menu editing
///
/// Input is validated before the cache is touched; every accepted edit is
/// followed by a PUT of the whole menu to `/menu`.
pub struct MenuEditor {
    store: Arc<dyn RemoteStore>,
    cache: Arc<StateCache>,
    events: EventBus,
    notifier: Arc<dyn Notifier>,
}

fn validate(name: &str, price: i64) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::empty_recipe_name());
    }
    if price <= 0 {
        return Err(AppError::invalid_price(price));
    }
    Ok(name.to_string())
}

impl MenuEditor {
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
        self.notifier.notify(Notification::from(&err));
        Err(err)
    }

    fn admin_checked(&self) -> AppResult<()> {
        if self.cache.is_admin() {
            Ok(())
        } else {
            self.reject(AppError::admin_required())
        }
    }

    /// Add a recipe; returns its id
    pub async fn add_recipe(&self, name: &str, price: i64) -> AppResult<i64> {
        self.admin_checked()?;
        let name = match validate(name, price) {
            Ok(name) => name,
            Err(e) => return self.reject(e),
        };

        let id = self.cache.add_recipe(&name, price);
        tracing::info!(recipe_id = id, name = %name, price, "Recipe added");
        self.publish_edit(format!("'{name}' added to the menu for ${price} (ID: {id})"))
            .await;
        Ok(id)
    }

    pub async fn update_recipe(&self, recipe_id: i64, name: &str, price: i64) -> AppResult<()> {
        self.admin_checked()?;
        let name = match validate(name, price) {
            Ok(name) => name,
            Err(e) => return self.reject(e),
        };
        if !self.cache.update_recipe(recipe_id, &name, price) {
            return self.reject(AppError::unknown_recipe(recipe_id));
        }

        tracing::info!(recipe_id, name = %name, price, "Recipe updated");
        self.publish_edit(format!("Recipe updated: {name}")).await;
        Ok(())
    }

    /// Remove a recipe; orders already placed keep their snapshot
    pub async fn remove_recipe(&self, recipe_id: i64) -> AppResult<Recipe> {
        self.admin_checked()?;
        let Some(recipe) = self.cache.recipe(recipe_id) else {
            return self.reject(AppError::unknown_recipe(recipe_id));
        };
        self.cache.remove_recipe(recipe_id);

        tracing::info!(recipe_id, name = %recipe.name, "Recipe removed");
        self.publish_edit(format!("Recipe removed: {}", recipe.name)).await;
        Ok(recipe)
    }

    async fn publish_edit(&self, message: String) {
        self.events.publish(SyncEvent::MenuChanged(self.cache.menu()));
        if self.save_menu().await {
            self.notifier
                .notify(Notification::success(NotificationCategory::Menu, "Success", message));
        } else {
            self.notifier.notify(Notification::warning(
                NotificationCategory::Menu,
                "Menu not saved",
                format!("{message}; the change is only local for now"),
            ));
        }
    }

    /// PUT the whole menu
    pub async fn save_menu(&self) -> bool {
        let menu = self.cache.menu();
        let saved = self.store.write(paths::MENU, &encode_menu(&menu)).await;
        if !saved {
            tracing::warn!(recipes = menu.len(), "Menu save failed");
        }
        saved
    }

    /// Replace the cached menu with the remote one
    ///
    /// An empty, unreachable or undecodable remote menu leaves the defaults
    /// in place. Returns the menu now in the cache.
    pub async fn load_menu(&self) -> Arc<Menu> {
        let remote = match self.store.read(paths::MENU).await.map(decode_menu) {
            Some(Ok(menu)) if !menu.is_empty() => Some(menu),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Remote menu unreadable");
                None
            }
            _ => None,
        };

        match remote {
            Some(menu) => {
                tracing::info!(recipes = menu.len(), "Menu loaded from store");
                self.cache.replace_menu(menu);
            }
            None => {
                tracing::info!("Remote menu empty, using default recipes");
                if self.cache.menu().is_empty() {
                    self.cache.replace_menu(default_menu());
                }
            }
        }
        let menu = self.cache.menu();
        self.events.publish(SyncEvent::MenuChanged(menu.clone()));
        menu
    }
}
