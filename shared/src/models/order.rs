//! Order Model

use super::Recipe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
///
/// Only `Pending` orders live in the store. `Completed` and `Cancelled`
/// describe how an order left the active set; the remote record is deleted
/// in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Order entity
///
/// `recipe_name` and `price` are captured when the order is created and are
/// never re-derived from the live menu; `recipe_id` is kept for traceability
/// only and may dangle once the recipe is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Derived from the submission time (unix millis)
    pub id: i64,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub price: i64,
    /// Display name of the submitting user
    pub customer: String,
    pub status: OrderStatus,
    /// Local wall-clock `HH:MM:SS` at creation
    pub time: String,
    /// Creation time in fractional unix seconds
    pub timestamp: f64,
}

impl Order {
    /// Snapshot `recipe` into a new pending order
    pub fn new(id: i64, recipe: &Recipe, customer: impl Into<String>) -> Self {
        Self {
            id,
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            price: recipe.price,
            customer: customer.into(),
            status: OrderStatus::Pending,
            time: crate::util::wall_clock(),
            timestamp: crate::util::now_secs_f64(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_snapshots_recipe() {
        let recipe = Recipe::new(3, "Soup", 10);
        let order = Order::new(1_700_000_000_000, &recipe, "alice");
        assert_eq!(order.recipe_id, 3);
        assert_eq!(order.recipe_name, "Soup");
        assert_eq!(order.price, 10);
        assert_eq!(order.customer, "alice");
        assert!(order.is_pending());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(OrderStatus::Pending).unwrap(), "pending");
        let status: OrderStatus = serde_json::from_value("cancelled".into()).unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }
}
