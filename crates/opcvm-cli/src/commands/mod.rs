//! CLI command implementations.

pub mod check;
pub mod config;
pub mod issuers;

// Re-export submodules for convenience
pub use check::CheckArgs;
pub use config::ConfigArgs;
pub use issuers::IssuersArgs;

use std::path::Path;

use opcvm_compliance::IssuerTable;
use opcvm_ext_file::load_issuer_table;

use crate::error::{CliError, CliResult};

/// Validates a ceiling or threshold given as a fraction.
pub fn validate_fraction(name: &'static str, value: f64) -> CliResult<f64> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CliError::InvalidFraction { name, value });
    }
    Ok(value)
}

/// Loads a custom issuer table, or the built-in one when no path is given.
pub fn resolve_issuer_table(path: Option<&Path>) -> anyhow::Result<IssuerTable> {
    match path {
        Some(p) => Ok(load_issuer_table(p)?),
        None => Ok(IssuerTable::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fraction() {
        assert_eq!(validate_fraction("threshold", 0.45).unwrap(), 0.45);
        assert!(validate_fraction("threshold", 45.0).is_err());
        assert!(validate_fraction("threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_builtin_table_by_default() {
        assert_eq!(resolve_issuer_table(None).unwrap(), IssuerTable::builtin());
    }
}
