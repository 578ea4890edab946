//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while interpreting core domain values.
///
/// Numeric cells never produce errors; see [`crate::numbers`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An issuer category label was not recognized.
    #[error("Unknown issuer category: '{label}'")]
    UnknownCategory {
        /// The label as supplied.
        label: String,
    },
}

impl CoreError {
    /// Creates an unknown category error.
    #[must_use]
    pub fn unknown_category(label: impl Into<String>) -> Self {
        Self::UnknownCategory {
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::unknown_category("semi-public");
        assert_eq!(err.to_string(), "Unknown issuer category: 'semi-public'");
    }
}
