//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Ceiling or threshold outside `[0, 1]`.
    #[error("Invalid {name}: {value}. Must be a fraction between 0 and 1 (e.g. 0.10 for 10%).")]
    InvalidFraction {
        /// Flag name.
        name: &'static str,
        /// Value supplied.
        value: f64,
    },

    /// Eligible issuer list without any id.
    #[error("Eligible issuer list is empty: '{0}'")]
    EmptyIssuerList(String),

    /// Refusing to overwrite an existing file.
    #[error("File already exists: {0}. Use --force to overwrite.")]
    FileExists(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
