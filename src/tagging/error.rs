//! Tag sequencing error types

use thiserror::Error;

/// Errors raised while interpreting a naming pattern.
///
/// These never leave [`super::generate_or_preserve`], which degrades to the
/// fallback identifier instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("naming pattern is empty")]
    EmptyPattern,

    #[error("naming pattern '{0}' has no 'N' placeholder")]
    MissingPlaceholder(String),

    #[error("failed to build matcher for pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
