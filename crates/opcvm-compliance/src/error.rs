//! Error types for the compliance engine.
//!
//! Business-data problems (bad figures, unknown issuers, funds without net
//! assets) are not errors; they degrade or skip. Errors here only cover
//! invalid reference data supplied by the caller.

use opcvm_core::CoreError;
use thiserror::Error;

/// Result type for compliance operations.
pub type ComplianceResult<T> = Result<T, ComplianceError>;

/// Errors that can occur while building compliance inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComplianceError {
    /// An issuer table rule cannot be used.
    #[error("Invalid issuer rule '{keyword}': {reason}")]
    InvalidIssuerRule {
        /// The rule keyword.
        keyword: String,
        /// Why the rule was rejected.
        reason: String,
    },

    /// An issuer category label was not recognized.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ComplianceError {
    /// Create an invalid issuer rule error.
    #[must_use]
    pub fn invalid_rule(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIssuerRule {
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ComplianceError::invalid_rule("ATW", "empty issuer id");
        assert!(err.to_string().contains("ATW"));
        assert!(err.to_string().contains("empty issuer id"));

        let err = ComplianceError::invalid_rule("", "empty keyword");
        assert_eq!(err.to_string(), "Invalid issuer rule '': empty keyword");

        let err: ComplianceError = CoreError::unknown_category("semi").into();
        assert!(err.to_string().contains("semi"));
    }
}
