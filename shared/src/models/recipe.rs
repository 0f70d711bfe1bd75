//! Recipe Model (menu item)

use serde::{Deserialize, Serialize};

/// Menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Price in whole currency units, always > 0
    pub price: i64,
}

/// Remote form of a recipe: the id is the key of the `/menu` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeBody {
    pub name: String,
    pub price: i64,
}

impl Recipe {
    pub fn new(id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    pub fn body(&self) -> RecipeBody {
        RecipeBody {
            name: self.name.clone(),
            price: self.price,
        }
    }

    pub fn from_body(id: i64, body: RecipeBody) -> Self {
        Self {
            id,
            name: body.name,
            price: body.price,
        }
    }
}
