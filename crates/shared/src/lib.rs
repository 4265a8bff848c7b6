//! Shared types, errors, and configuration for Spendful.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money display for integer minor-unit amounts
//! - Lenient date parsing and slug generation
//! - Field-keyed validation errors and the application error
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, FieldErrors};
