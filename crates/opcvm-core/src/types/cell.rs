//! Raw spreadsheet cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell read from a portfolio workbook.
///
/// File adapters convert their native cell type into this enum so that the
/// loader and the number normalizer stay independent of any file format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// No content.
    #[default]
    Empty,
    /// Integer cell.
    Int(i64),
    /// Floating-point cell (includes date serials).
    Float(f64),
    /// Boolean cell.
    Bool(bool),
    /// Text cell, kept verbatim.
    Text(String),
}

impl CellValue {
    /// Returns true if the cell is empty or holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Float(f) => f.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }

    /// Returns the cell rendered as trimmed text, or `None` if blank.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            Self::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("  ").is_blank());
        assert!(CellValue::Float(f64::NAN).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::from("x").is_blank());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::from("  CDG CASH  ").as_text().as_deref(), Some("CDG CASH"));
        assert_eq!(CellValue::Int(7).as_text().as_deref(), Some("7"));
        assert_eq!(CellValue::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<f64>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("a")), CellValue::Text("a".into()));
    }
}
