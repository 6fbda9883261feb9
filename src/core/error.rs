//! Error types for admission and decision operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::request::RequestStatus;

/// Errors produced by the admission engine and its stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Input was malformed (metadata, identifiers, status literals).
    #[error("validation failed: {0}")]
    Validation(String),
    /// Resource or request does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A request already exists for the resource/requester pair.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Resource is not accepting requests or has no free seat.
    #[error("capacity state: {0}")]
    CapacityState(String),
    /// Actor may not decide for the owning resource.
    #[error("not authorized: {0}")]
    Authorization(String),
    /// Transition is not in the transition table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: RequestStatus,
        /// Requested status.
        to: RequestStatus,
    },
    /// Store or transaction failure.
    #[error("internal error: {message}")]
    Internal {
        /// Failure description.
        message: String,
        /// Whether the caller may safely re-run the operation.
        retryable: bool,
    },
}

/// Stable, caller-facing classification of an [`AdmissionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// See [`AdmissionError::Validation`].
    ValidationError,
    /// See [`AdmissionError::NotFound`].
    NotFound,
    /// See [`AdmissionError::Conflict`].
    Conflict,
    /// See [`AdmissionError::CapacityState`].
    CapacityState,
    /// See [`AdmissionError::Authorization`].
    Authorization,
    /// See [`AdmissionError::InvalidTransition`].
    InvalidTransition,
    /// See [`AdmissionError::Internal`].
    Internal,
}

impl ErrorKind {
    /// Stable wire code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::CapacityState => "CAPACITY_STATE",
            Self::Authorization => "AUTHORIZATION",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl AdmissionError {
    /// Internal failure that the caller may retry (lock or transaction timeout).
    pub fn retryable(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            retryable: true,
        }
    }

    /// Internal failure that indicates a bug or corrupted state.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            retryable: false,
        }
    }

    /// Classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CapacityState(_) => ErrorKind::CapacityState,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// True only for transient store failures.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal { retryable: true, .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
