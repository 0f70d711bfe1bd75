//! Decoding of remote collections
//!
//! The store hands back whole collections as loosely shaped JSON. Records
//! written by other clients may be partial or malformed; those are skipped
//! one by one. Only a collection of the wrong shape altogether counts as a
//! fault.
//!
//! Objects whose keys are small consecutive integers can come back as JSON
//! arrays (index = key, holes as `null`), so the menu and order decoders
//! accept both forms.

use super::SyncError;
use crate::cache::Menu;
use serde_json::{Map, Value, json};
use shared::message::Notification;
use shared::models::{Order, Recipe, RecipeBody, presence};

/// Key/record pairs of an object- or array-shaped collection
fn entries(path: &'static str, value: Value) -> Result<Vec<(String, Value)>, SyncError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect()),
        other => Err(SyncError::UnexpectedShape {
            path,
            found: kind(&other),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// All decodable orders, sorted by id
pub fn decode_orders(value: Value) -> Result<Vec<Order>, SyncError> {
    let mut orders: Vec<Order> = entries("/orders", value)?
        .into_iter()
        .filter_map(|(key, record)| match serde_json::from_value::<Order>(record) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping malformed order record");
                None
            }
        })
        .collect();
    orders.sort_by_key(|o| o.id);
    Ok(orders)
}

/// Names of users whose `last_seen` lies within `window_secs` of `now`,
/// sorted
///
/// An entry's `name` field wins over its key; entries without a usable
/// `last_seen` count as never seen.
pub fn decode_online_users(value: Value, now: i64, window_secs: i64) -> Result<Vec<String>, SyncError> {
    let mut users: Vec<String> = entries("/online_users", value)?
        .into_iter()
        .filter_map(|(key, record)| {
            let record = record.as_object()?;
            // Rounding up keeps fractional timestamps exact against integer bounds
            let last_seen = record.get("last_seen").and_then(Value::as_f64)?.ceil() as i64;
            if !presence::is_online(last_seen, now, window_secs) {
                return None;
            }
            let name = record
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(key);
            Some(name)
        })
        .collect();
    users.sort();
    users.dedup();
    Ok(users)
}

/// Menu from its remote form `{id: {name, price}}`
pub fn decode_menu(value: Value) -> Result<Menu, SyncError> {
    Ok(entries("/menu", value)?
        .into_iter()
        .filter_map(|(key, record)| {
            let Ok(id) = key.parse::<i64>() else {
                tracing::warn!(key = %key, "Skipping menu entry with non-numeric id");
                return None;
            };
            match serde_json::from_value::<RecipeBody>(record) {
                Ok(body) if body.price > 0 => Some((id, Recipe::from_body(id, body))),
                Ok(body) => {
                    tracing::warn!(id, price = body.price, "Skipping menu entry with invalid price");
                    None
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "Skipping malformed menu entry");
                    None
                }
            }
        })
        .collect())
}

/// Remote form of the menu
pub fn encode_menu(menu: &Menu) -> Value {
    let map: Map<String, Value> = menu
        .iter()
        .map(|(id, recipe)| (id.to_string(), json!(recipe.body())))
        .collect();
    Value::Object(map)
}

/// Queued notifications with their store keys
pub fn decode_notifications(value: Value) -> Result<Vec<(String, Notification)>, SyncError> {
    let mut queued: Vec<(String, Notification)> = entries("/notifications", value)?
        .into_iter()
        .filter_map(|(key, record)| match serde_json::from_value::<Notification>(record) {
            Ok(n) => Some((key, n)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping malformed notification");
                None
            }
        })
        .collect();
    queued.sort_by_key(|(_, n)| n.created_at);
    Ok(queued)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_json(id: i64, customer: &str, status: &str) -> Value {
        json!({
            "id": id,
            "recipe_id": 1,
            "recipe_name": "Soup",
            "price": 10,
            "customer": customer,
            "status": status,
            "time": "12:00:00",
            "timestamp": 1.0
        })
    }

    #[test]
    fn test_decode_orders_skips_malformed() {
        let value = json!({
            "2": order_json(2, "bob", "pending"),
            "1": order_json(1, "alice", "pending"),
            "3": {"id": "broken"},
            "4": null
        });
        let orders = decode_orders(value).unwrap();
        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_decode_orders_wrong_shape() {
        let err = decode_orders(json!("nonsense")).unwrap_err();
        assert!(matches!(err, SyncError::UnexpectedShape { path: "/orders", found: "string" }));
    }

    #[test]
    fn test_online_window() {
        let now = 10_000;
        let value = json!({
            "fresh": {"name": "fresh", "joined": "12:00:00", "last_seen": now - 29},
            "stale": {"name": "stale", "joined": "12:00:00", "last_seen": now - 31},
            "edge": {"name": "edge", "last_seen": now - 30},
            "float": {"last_seen": (now - 1) as f64 + 0.5},
            "half": {"last_seen": (now - 30) as f64 + 0.5},
            "late": {"last_seen": (now - 31) as f64 + 0.5},
            "missing": {"name": "missing"},
            "scalar": 7
        });
        let users = decode_online_users(value, now, 30).unwrap();
        assert_eq!(users, vec!["float".to_string(), "fresh".to_string(), "half".to_string()]);
    }

    #[test]
    fn test_decode_menu_object_and_array_forms() {
        let object = json!({
            "1": {"name": "Soup", "price": 10},
            "2": {"name": "Bread", "price": 5},
            "x": {"name": "Bad key", "price": 5},
            "3": {"name": "Free", "price": 0}
        });
        let menu = decode_menu(object).unwrap();
        assert_eq!(menu.keys().copied().collect::<Vec<_>>(), vec![1, 2]);

        let array = json!([null, {"name": "Soup", "price": 10}, null, {"name": "Stew", "price": 7}]);
        let menu = decode_menu(array).unwrap();
        assert_eq!(menu.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(menu[&3].name, "Stew");
    }

    #[test]
    fn test_menu_encoding_matches_remote_layout() {
        let mut menu = Menu::new();
        menu.insert(4, Recipe::new(4, "Gumbo", 70));
        let encoded = encode_menu(&menu);
        assert_eq!(encoded, json!({"4": {"name": "Gumbo", "price": 70}}));
        assert_eq!(decode_menu(encoded).unwrap(), menu);
    }

    #[test]
    fn test_decode_notifications_sorted_by_creation() {
        use shared::message::NotificationCategory;

        let mut older = Notification::info(NotificationCategory::Order, "a", "first");
        older.created_at = 1;
        let mut newer = Notification::info(NotificationCategory::Order, "b", "second");
        newer.created_at = 2;

        let value = json!({ "k2": newer, "k1": older, "bad": {"title": 1} });
        let queued = decode_notifications(value).unwrap();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].0, "k1");
        assert_eq!(queued[1].1.message, "second");
    }
}
