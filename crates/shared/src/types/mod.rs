//! Common types used across the application.

pub mod date;
pub mod id;
pub mod money;
pub mod slug;

pub use date::{beginning_of_month, end_of_month, is_last_day_of_month, last_day_of_month, parse_date};
pub use id::*;
pub use money::{MAX_AMOUNT, Money};
pub use slug::{parameterize, unique_slug};
