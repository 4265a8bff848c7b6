//! Core logic for Spendful.
//!
//! This crate contains the budgeting engine with ZERO web or database dependencies.
//! Storage sits behind the [`store::Store`] trait so the engine can be driven by
//! the in-memory store, a snapshot file, or anything else that implements it.
//!
//! # Modules
//!
//! - `recurrence` - Schedules and the rule-based date series behind them
//! - `item` - Recurring items and their validation
//! - `transaction` - Recorded transactions, linked, misc and orphaned
//! - `occurrence` - Virtual occurrences, their editing and destruction
//! - `budget` - Budget listings and balance projection
//! - `store` - Persistence trait, queries and the in-memory store

pub mod budget;
pub mod item;
pub mod occurrence;
pub mod recurrence;
pub mod store;
pub mod transaction;
