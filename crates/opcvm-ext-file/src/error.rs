//! File boundary errors.

use opcvm_compliance::ComplianceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised at the file boundary.
#[derive(Debug, Error)]
pub enum FileError {
    /// File could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be opened or a sheet could not be read.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// No sheet of the workbook contributed any holding.
    #[error("No valid data found in workbook")]
    NoValidData,

    /// Malformed issuer table CSV.
    #[error("Issuer table error at line {line}: {message}")]
    IssuerCsv {
        /// 1-based line number, header included.
        line: u64,
        /// Description of the problem.
        message: String,
    },

    /// Issuer table content rejected by the engine.
    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook export error.
    #[error("Export error: {0}")]
    Export(String),
}

impl FileError {
    /// Creates an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an issuer table error.
    pub fn issuer_csv(line: u64, message: impl Into<String>) -> Self {
        Self::IssuerCsv {
            line,
            message: message.into(),
        }
    }
}

impl From<calamine::Error> for FileError {
    fn from(err: calamine::Error) -> Self {
        Self::Workbook(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for FileError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}
