//! Run-level indicators.

use crate::types::{ConcentrationCheckResult, RatioRecord};
use opcvm_core::{IssuerCategory, SOVEREIGN_ISSUER};
use serde::{Deserialize, Serialize};

/// Maximum number of non-compliant issuers listed in a summary.
pub const MAX_LISTED_ISSUERS: usize = 5;

/// Headline figures of a compliance run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Number of (fund, issuer) ratios.
    pub ratio_count: usize,

    /// Ratios within their ceiling.
    pub compliant_count: usize,

    /// Ratios above their ceiling.
    pub non_compliant_count: usize,

    /// `compliant_count / ratio_count * 100`, or `0` with no ratio.
    pub compliance_rate_pct: f64,

    /// Ratios on the sovereign issuer.
    pub sovereign_count: usize,

    /// Ratios on private issuers.
    pub private_count: usize,

    /// Funds evaluated.
    pub fund_count: usize,

    /// Funds passing the concentration rule.
    pub concentration_compliant_funds: usize,

    /// First distinct non-compliant issuers, in ratio order.
    pub non_compliant_issuers: Vec<String>,
}

impl ComplianceSummary {
    /// Builds the summary of a run.
    #[must_use]
    pub fn calculate(ratios: &[RatioRecord], concentration: &[ConcentrationCheckResult]) -> Self {
        let compliant_count = ratios.iter().filter(|r| r.is_compliant).count();
        let non_compliant_count = ratios.len() - compliant_count;

        let compliance_rate_pct = if ratios.is_empty() {
            0.0
        } else {
            compliant_count as f64 / ratios.len() as f64 * 100.0
        };

        let mut non_compliant_issuers: Vec<String> = Vec::new();
        for r in ratios.iter().filter(|r| !r.is_compliant) {
            if non_compliant_issuers.len() == MAX_LISTED_ISSUERS {
                break;
            }
            if !non_compliant_issuers.contains(&r.issuer_id) {
                non_compliant_issuers.push(r.issuer_id.clone());
            }
        }

        Self {
            ratio_count: ratios.len(),
            compliant_count,
            non_compliant_count,
            compliance_rate_pct,
            sovereign_count: ratios
                .iter()
                .filter(|r| r.issuer_id == SOVEREIGN_ISSUER)
                .count(),
            private_count: ratios
                .iter()
                .filter(|r| r.issuer_category == IssuerCategory::Private)
                .count(),
            fund_count: concentration.len(),
            concentration_compliant_funds: concentration.iter().filter(|c| c.is_compliant).count(),
            non_compliant_issuers,
        }
    }

    /// Returns true if every ratio and every fund passes.
    #[must_use]
    pub fn is_fully_compliant(&self) -> bool {
        self.non_compliant_count == 0 && self.concentration_compliant_funds == self.fund_count
    }

    /// Funds breaching the concentration rule.
    #[must_use]
    pub fn concentration_breaches(&self) -> usize {
        self.fund_count - self.concentration_compliant_funds
    }
}
