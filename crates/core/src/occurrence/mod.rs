//! Occurrences of recurring items.
//!
//! This module implements:
//! - The occurrence projector (between, until, limit, all, exists, fetch, ordinal)
//! - Pending-change tracking on a single occurrence
//! - The edit engine that turns occurrence edits into item mutations or splits
//! - Occurrence deletion

pub mod editor;
pub mod error;
pub mod projector;
pub mod types;

#[cfg(test)]
mod projector_props;

pub use editor::{HandlerOutcome, Mutation, Rejection, SplitItem, Truncation};
pub use error::OccurrenceError;
pub use projector::Occurrences;
pub use types::{ChangeSet, DateEntry, IntoDate, Occurrence};
