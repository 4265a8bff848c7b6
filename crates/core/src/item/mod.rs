//! Recurring budget items.

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use error::ItemError;
pub use service::ItemService;
pub use types::{Category, NewItem, RecurringItem};
