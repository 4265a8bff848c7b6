//! Budgets: budget-wide occurrence listings, miscellaneous transactions and
//! balance projection.

pub mod balance;
pub mod error;
pub mod service;
pub mod types;


pub use balance::{BalanceService, Projection};
pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{Budget, PeriodFilter};
