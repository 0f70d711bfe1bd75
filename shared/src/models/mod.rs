//! Data models shared between the store client and the engine

pub mod order;
pub mod presence;
pub mod recipe;
pub mod session;

pub use order::{Order, OrderStatus};
pub use presence::PresenceEntry;
pub use recipe::{Recipe, RecipeBody};
pub use session::{ADMIN_USERNAME, Session};
