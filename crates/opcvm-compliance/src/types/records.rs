//! Result records produced by the rules.

use opcvm_core::format::format_percent;
use opcvm_core::IssuerCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ceiling applied to a (fund, issuer) exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeilingKind {
    /// Sovereign or public issuer.
    Sovereign,
    /// Equity position in an eligible issuer.
    EligibleEquity,
    /// Any other issuer.
    Standard,
}

impl fmt::Display for CeilingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sovereign => "sovereign",
            Self::EligibleEquity => "eligible equity",
            Self::Standard => "standard",
        };
        write!(f, "{}", name)
    }
}

/// Exposure of one fund to one issuer.
///
/// Exactly one record exists per distinct (fund, issuer) pair in the holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    /// Fund identifier.
    pub fund_id: String,

    /// Issuer identifier.
    pub issuer_id: String,

    /// Issuer category (taken from the first holding of the group).
    pub issuer_category: IssuerCategory,

    /// Sum of holding values for this fund and issuer.
    pub total_value: f64,

    /// Fund net assets.
    pub net_assets: f64,

    /// `total_value / net_assets`.
    pub ratio: f64,

    /// Applicable ceiling as a fraction.
    pub ceiling: f64,

    /// Which ceiling was selected.
    pub ceiling_kind: CeilingKind,

    /// True if any holding of the group is an equity line.
    pub is_equity: bool,

    /// Number of holdings aggregated into this record.
    pub holding_count: usize,

    /// `ratio <= ceiling + tolerance`.
    pub is_compliant: bool,

    /// `(ratio - ceiling) * 100`, in percentage points.
    pub deviation: f64,

    /// Deviation above the alert threshold.
    pub alert: bool,
}

impl RatioRecord {
    /// Ratio rendered with two decimals, e.g. `"14.00%"`.
    #[must_use]
    pub fn ratio_pct(&self) -> String {
        format_percent(self.ratio, 2)
    }

    /// Ceiling rendered without decimals, e.g. `"15%"`.
    #[must_use]
    pub fn ceiling_pct(&self) -> String {
        format_percent(self.ceiling, 0)
    }

    /// Deviation rendered with two decimals, e.g. `"5.00%"`.
    #[must_use]
    pub fn deviation_pct(&self) -> String {
        format!("{:.2}%", self.deviation)
    }
}

/// Outcome of the cumulative concentration rule for one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationCheckResult {
    /// Fund identifier.
    pub fund_id: String,

    /// Fund net assets.
    pub net_assets: f64,

    /// Total value of qualifying issuers.
    pub sum_above_threshold: f64,

    /// `sum_above_threshold / net_assets`.
    pub cumulative_ratio: f64,

    /// Cap on the cumulative ratio.
    pub cumulative_ceiling: f64,

    /// `cumulative_ratio <= cumulative_ceiling + tolerance`.
    pub is_compliant: bool,

    /// Distinct issuers feeding the sum, in ratio-table order.
    pub contributing_issuers: Vec<String>,
}

impl ConcentrationCheckResult {
    /// Number of contributing issuers.
    #[must_use]
    pub fn issuer_count(&self) -> usize {
        self.contributing_issuers.len()
    }

    /// Cumulative ratio rendered with two decimals.
    #[must_use]
    pub fn cumulative_ratio_pct(&self) -> String {
        format_percent(self.cumulative_ratio, 2)
    }

    /// Cumulative ceiling rendered without decimals.
    #[must_use]
    pub fn cumulative_ceiling_pct(&self) -> String {
        format_percent(self.cumulative_ceiling, 0)
    }

    /// Contributing issuers joined for display, or `"None"`.
    #[must_use]
    pub fn contributing_label(&self) -> String {
        if self.contributing_issuers.is_empty() {
            "None".to_string()
        } else {
            self.contributing_issuers.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ratio: f64, ceiling: f64) -> RatioRecord {
        RatioRecord {
            fund_id: "F".into(),
            issuer_id: "ATW".into(),
            issuer_category: IssuerCategory::Private,
            total_value: ratio * 1_000_000.0,
            net_assets: 1_000_000.0,
            ratio,
            ceiling,
            ceiling_kind: CeilingKind::EligibleEquity,
            is_equity: true,
            holding_count: 1,
            is_compliant: true,
            deviation: (ratio - ceiling) * 100.0,
            alert: false,
        }
    }

    #[test]
    fn test_percent_rendering() {
        let r = record(0.14, 0.15);
        assert_eq!(r.ratio_pct(), "14.00%");
        assert_eq!(r.ceiling_pct(), "15%");
        assert_eq!(r.deviation_pct(), "-1.00%");
    }

    #[test]
    fn test_contributing_label() {
        let mut c = ConcentrationCheckResult {
            fund_id: "F".into(),
            net_assets: 1.0,
            sum_above_threshold: 0.0,
            cumulative_ratio: 0.0,
            cumulative_ceiling: 0.45,
            is_compliant: true,
            contributing_issuers: vec![],
        };
        assert_eq!(c.contributing_label(), "None");
        assert_eq!(c.cumulative_ceiling_pct(), "45%");

        c.contributing_issuers = vec!["ATW".into(), "IAM".into()];
        assert_eq!(c.contributing_label(), "ATW, IAM");
        assert_eq!(c.issuer_count(), 2);
    }

    #[test]
    fn test_ceiling_kind_display() {
        assert_eq!(CeilingKind::EligibleEquity.to_string(), "eligible equity");
    }
}
