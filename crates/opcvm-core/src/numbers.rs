//! Number normalization for spreadsheet figures.
//!
//! Portfolio statements arrive with figures typed as text in a variety of
//! local conventions: spaces or non-breaking spaces as thousands separators,
//! commas as noise, stray currency suffixes. [`clean_number`] turns any cell
//! into an `f64` and never fails: everything it cannot read becomes `0.0`.
//!
//! Commas are deleted, not interpreted as a decimal mark, so `"1 234,56"`
//! reads as `123456.0`.
//!
//! [`normalize_number`] returns the same value together with a
//! [`NumberQuality`] so that callers can count cells whose content was
//! discarded.

use crate::types::CellValue;
use serde::{Deserialize, Serialize};

/// Characters removed from text before parsing.
const STRIPPED_CHARS: [char; 8] = [
    ' ', '\u{00A0}', '\u{202F}', '\u{2009}', ',', '\t', '\n', '\r',
];

/// How a cell was turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberQuality {
    /// Numeric cell, or text that parsed directly.
    Clean,
    /// Empty cell, NaN, a bare `-` or the literal `nan`; read as zero.
    Blank,
    /// Text parsed only after discarding non-numeric characters.
    Recovered,
    /// Non-blank content that could not be read; replaced by zero.
    Degraded,
}

impl NumberQuality {
    /// Returns true if non-blank content was replaced by zero.
    #[must_use]
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// Converts a cell into a number, falling back to `0.0`.
///
/// # Examples
///
/// ```
/// use opcvm_core::{clean_number, CellValue};
///
/// assert_eq!(clean_number(&CellValue::from("2 500 000")), 2_500_000.0);
/// assert_eq!(clean_number(&CellValue::from("12.5 MAD")), 12.5);
/// assert_eq!(clean_number(&CellValue::from("n/a")), 0.0);
/// assert_eq!(clean_number(&CellValue::Empty), 0.0);
/// ```
#[must_use]
pub fn clean_number(value: &CellValue) -> f64 {
    normalize_number(value).0
}

/// Converts a cell into a number and reports how the value was obtained.
#[must_use]
pub fn normalize_number(value: &CellValue) -> (f64, NumberQuality) {
    match value {
        CellValue::Empty => (0.0, NumberQuality::Blank),
        CellValue::Int(i) => (*i as f64, NumberQuality::Clean),
        CellValue::Float(f) if f.is_nan() => (0.0, NumberQuality::Blank),
        CellValue::Float(f) if f.is_infinite() => (0.0, NumberQuality::Degraded),
        CellValue::Float(f) => (*f, NumberQuality::Clean),
        CellValue::Bool(b) => (if *b { 1.0 } else { 0.0 }, NumberQuality::Clean),
        CellValue::Text(s) => normalize_text(s),
    }
}

fn normalize_text(raw: &str) -> (f64, NumberQuality) {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    if compact.is_empty() || compact == "-" || compact.eq_ignore_ascii_case("nan") {
        return (0.0, NumberQuality::Blank);
    }

    if let Some(v) = parse_finite(&compact) {
        return (v, NumberQuality::Clean);
    }

    let digits: String = compact
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match parse_finite(&digits) {
        Some(v) => (v, NumberQuality::Recovered),
        None => (0.0, NumberQuality::Degraded),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(clean_number(&CellValue::Int(42)), 42.0);
        assert_eq!(clean_number(&CellValue::Float(1.5)), 1.5);
        assert_eq!(clean_number(&CellValue::Float(-3.0)), -3.0);
        assert_eq!(clean_number(&CellValue::Bool(true)), 1.0);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(normalize_number(&CellValue::Empty), (0.0, NumberQuality::Blank));
        assert_eq!(
            normalize_number(&CellValue::Float(f64::NAN)),
            (0.0, NumberQuality::Blank)
        );
        assert_eq!(normalize_number(&text("")), (0.0, NumberQuality::Blank));
        assert_eq!(normalize_number(&text("   ")), (0.0, NumberQuality::Blank));
        assert_eq!(normalize_number(&text("-")), (0.0, NumberQuality::Blank));
        assert_eq!(normalize_number(&text("nan")), (0.0, NumberQuality::Blank));
    }

    #[test]
    fn test_space_variants_removed() {
        assert_eq!(clean_number(&text("1 234 567")), 1_234_567.0);
        assert_eq!(clean_number(&text("1\u{00A0}234\u{00A0}567")), 1_234_567.0);
        assert_eq!(clean_number(&text("1\u{202F}000")), 1_000.0);
        assert_eq!(clean_number(&text("\t98 500\n")), 98_500.0);
    }

    #[test]
    fn test_comma_is_deleted_not_decimal() {
        assert_eq!(clean_number(&text("1 234,56")), 123_456.0);
        assert_eq!(clean_number(&text("1,234,567.89")), 1_234_567.89);
    }

    #[test]
    fn test_fallback_strips_noise() {
        assert_eq!(
            normalize_number(&text("12.5 MAD")),
            (12.5, NumberQuality::Recovered)
        );
        assert_eq!(clean_number(&text("(250)")), 250.0);
    }

    #[test]
    fn test_unreadable_degrades_to_zero() {
        assert_eq!(normalize_number(&text("n/a")), (0.0, NumberQuality::Degraded));
        assert_eq!(normalize_number(&text("1.2.3")), (0.0, NumberQuality::Degraded));
        assert_eq!(normalize_number(&text("inf")), (0.0, NumberQuality::Degraded));
        assert!(NumberQuality::Degraded.is_degraded());
        assert!(!NumberQuality::Recovered.is_degraded());
    }

    #[test]
    fn test_infinite_float_degrades() {
        assert_eq!(
            normalize_number(&CellValue::Float(f64::INFINITY)),
            (0.0, NumberQuality::Degraded)
        );
    }

    #[test]
    fn test_negative_text() {
        assert_eq!(clean_number(&text("-1 500")), -1_500.0);
    }
}
