//! Display helpers for ratios and amounts.
//!
//! Ratios and ceilings are carried as plain fractions (`0.10` = 10%).
//! These helpers only render them; nothing in the engine compares strings.

/// Renders a fraction as a percentage with the given number of decimals.
///
/// # Examples
///
/// ```
/// use opcvm_core::format::format_percent;
///
/// assert_eq!(format_percent(0.14, 2), "14.00%");
/// assert_eq!(format_percent(0.15, 0), "15%");
/// ```
#[must_use]
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Renders an amount rounded to the unit, with spaces between thousands.
///
/// # Examples
///
/// ```
/// use opcvm_core::format::format_amount;
///
/// assert_eq!(format_amount(1_234_567.4), "1 234 567");
/// assert_eq!(format_amount(-2_500.0), "-2 500");
/// ```
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0, 2), "0.00%");
        assert_eq!(format_percent(1.0, 0), "100%");
        assert_eq!(format_percent(0.4512, 2), "45.12%");
        assert_eq!(format_percent(0.05, 1), "5.0%");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1_000.0), "1 000");
        assert_eq!(format_amount(12_345_678.9), "12 345 679");
        assert_eq!(format_amount(-0.2), "0");
    }
}
