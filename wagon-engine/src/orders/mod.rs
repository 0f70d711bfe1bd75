//! Order Lifecycle Manager and menu editing

pub mod lifecycle;
pub mod menu;

pub use lifecycle::{ClosedOrder, OrderLifecycle, Submission};
pub use menu::MenuEditor;
