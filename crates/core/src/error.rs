//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the capture model
/// (validation, unknown keys). Storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. nothing to save).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An item label outside the fixed list of a sheet.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// A section label that cannot identify an operational section.
    #[error("invalid section: {0}")]
    InvalidSection(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_item(label: impl Into<String>) -> Self {
        Self::UnknownItem(label.into())
    }

    pub fn invalid_section(msg: impl Into<String>) -> Self {
        Self::InvalidSection(msg.into())
    }
}
