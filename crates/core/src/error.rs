//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, client-side failures (validation,
/// identifiers). Transport concerns belong to the portal crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a required field left blank).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Identity is missing or does not grant the action.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Ensure every listed field is non-empty after trimming whitespace.
///
/// Returns the names of the blank fields in a validation error.
pub fn require_filled(fields: &[(&str, &str)]) -> DomainResult<()> {
    let blank: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "required fields are blank: {}",
            blank.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_counts_as_blank() {
        let err = require_filled(&[("fullName", "   "), ("email", "a@b.c")]).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("required fields are blank: fullName".to_string())
        );
    }

    #[test]
    fn filled_fields_pass() {
        assert!(require_filled(&[("title", " Algebra ")]).is_ok());
    }
}
