//! Shared primitives for all Rust crates in Ironbeam.

#![forbid(unsafe_code)]

/// Failures reported by external persistence collaborators.
pub mod collaborator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use collaborator::{CollaboratorError, CollaboratorErrorKind, CollaboratorResult};

/// Result type used across Ironbeam crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed record or missing required field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller passed an argument outside the operation contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The external persistence layer failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl AppError {
    /// Returns the collaborator failure wrapped by this error, if any.
    #[must_use]
    pub fn as_collaborator(&self) -> Option<&CollaboratorError> {
        match self {
            Self::Collaborator(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::{AppError, CollaboratorError, CollaboratorErrorKind, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_validates_on_deserialize() {
        let blank = serde_json::from_str::<NonEmptyString>("\"  \"");
        assert!(blank.is_err());

        let parsed = serde_json::from_str::<NonEmptyString>("\"doc-1\"");
        assert_eq!(
            parsed.map(String::from).unwrap_or_default(),
            "doc-1".to_owned()
        );
    }

    #[test]
    fn collaborator_error_keeps_its_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let error: AppError =
            CollaboratorError::with_source(CollaboratorErrorKind::Transport, "fetch failed", cause)
                .into();

        let collaborator = error.as_collaborator();
        assert_eq!(
            collaborator.map(CollaboratorError::kind),
            Some(CollaboratorErrorKind::Transport)
        );
        let source = error.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("reset by peer"));
    }
}
