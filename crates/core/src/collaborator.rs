use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Result type returned by persistence collaborators.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Broad category of a collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorErrorKind {
    /// The collaborator has no record with the requested identifier.
    NotFound,
    /// The collaborator refused the request (4xx-style rejection).
    Rejected,
    /// The request never completed (connection, timeout, exhausted retries).
    Transport,
    /// The collaborator answered with a payload that could not be decoded.
    Decode,
}

impl CollaboratorErrorKind {
    /// Returns a stable label for the failure category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
            Self::Decode => "decode",
        }
    }
}

impl Display for CollaboratorErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure raised by an external persistence collaborator.
///
/// The original cause, when there is one, stays reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("collaborator error ({kind}): {message}")]
pub struct CollaboratorError {
    kind: CollaboratorErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl CollaboratorError {
    /// Creates a collaborator failure without an underlying cause.
    #[must_use]
    pub fn new(kind: CollaboratorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a collaborator failure wrapping its underlying cause.
    #[must_use]
    pub fn with_source(
        kind: CollaboratorErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a missing-record failure.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorKind::NotFound, message)
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> CollaboratorErrorKind {
        self.kind
    }

    /// Returns the human-readable failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}
