use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape used across all backend layers.
///
/// `code` is a stable SCREAMING_SNAKE identifier a presentation layer can
/// branch on; `message` is human-readable; `details` carries the underlying
/// driver text when one exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// True for errors raised by argument validation before any I/O.
    pub fn is_invalid_argument(&self) -> bool {
        self.code == "INVALID_ARGUMENT"
    }

    /// True for errors signaling that a referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code.ends_with("_NOT_FOUND")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
