//! Application-wide error types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Field-keyed validation messages.
///
/// Rejections never abort an edit half-way; they are collected here under the
/// name of the attribute that failed, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`, empty when none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `field` has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Appends every message of `other`, keeping field names.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Drops all messages.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| (field.as_str(), message.as_str()))
        })
    }

    /// Messages prefixed with a humanized field name, e.g. "Starts on must be a valid date".
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(field, message)| format!("{} {message}", humanize(field)))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unbounded enumeration requested on a series without an end date.
    #[error("Item must have an ending date to access all occurrences")]
    NoEndDate,

    /// The persistence layer failed; the surrounding commit was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NoEndDate => "NO_END_DATE",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the caller can fix the input and retry.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_collects_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("schedule", "cannot be changed when transactions exist after this occurrence");
        errors.add("amount", "cannot be changed when transactions exist after this occurrence");
        errors.add("amount", "must be less than or equal to 2147483647");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("amount").len(), 2);
        assert!(errors.get("name").is_empty());
        assert!(errors.contains("schedule"));
    }

    #[test]
    fn test_field_errors_merge() {
        let mut left = FieldErrors::new();
        left.add("name", "can't be blank");
        let mut right = FieldErrors::new();
        right.add("name", "has already been taken");
        right.add("ends_on", "must be after starts on");

        left.merge(right);
        assert_eq!(left.get("name"), ["can't be blank", "has already been taken"]);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn test_full_messages_humanize_field() {
        let mut errors = FieldErrors::new();
        errors.add("starts_on", "must be a valid date");
        assert_eq!(errors.full_messages(), vec!["Starts on must be a valid date"]);
        assert_eq!(errors.to_string(), "Starts on must be a valid date");
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("date", "is taken");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"date":["is taken"]}"#);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(FieldErrors::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::NoEndDate.error_code(), "NO_END_DATE");
        assert_eq!(
            AppError::Persistence(String::new()).error_code(),
            "PERSISTENCE_ERROR"
        );
        assert_eq!(AppError::Config(String::new()).error_code(), "CONFIG_ERROR");
        assert_eq!(AppError::Internal(String::new()).error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("item".into()).to_string(),
            "Not found: item"
        );
        assert_eq!(
            AppError::NoEndDate.to_string(),
            "Item must have an ending date to access all occurrences"
        );
        assert!(AppError::NotFound(String::new()).is_user_recoverable());
        assert!(!AppError::Persistence(String::new()).is_user_recoverable());
    }
}
