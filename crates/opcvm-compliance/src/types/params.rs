//! Regulatory parameters of a compliance run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Issuers eligible for the relaxed equity ceiling by default.
pub const DEFAULT_ELIGIBLE_EQUITY_ISSUERS: [&str; 4] = ["ATW", "IAM", "BCP", "BOA"];

/// Ceilings and thresholds applied to a run.
///
/// All values are fractions of net assets (`0.10` = 10%). The struct is
/// immutable input: every engine function takes it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceParams {
    /// Ceiling for the sovereign issuer and public issuers.
    pub ceiling_sovereign: f64,

    /// Ceiling for equity positions in issuers on the eligible list.
    pub ceiling_eligible_equity: f64,

    /// Ceiling for every other issuer.
    pub ceiling_standard: f64,

    /// Issuer ids eligible for [`Self::ceiling_eligible_equity`].
    pub eligible_equity_issuers: BTreeSet<String>,

    /// Cap on the cumulative weight of issuers individually above 10%.
    pub concentration_threshold: f64,
}

impl Default for ComplianceParams {
    fn default() -> Self {
        Self {
            ceiling_sovereign: 1.00,
            ceiling_eligible_equity: 0.15,
            ceiling_standard: 0.10,
            eligible_equity_issuers: DEFAULT_ELIGIBLE_EQUITY_ISSUERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            concentration_threshold: 0.45,
        }
    }
}

impl ComplianceParams {
    /// Creates parameters with the regulatory defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sovereign ceiling.
    #[must_use]
    pub fn with_ceiling_sovereign(mut self, ceiling: f64) -> Self {
        self.ceiling_sovereign = ceiling;
        self
    }

    /// Sets the eligible-equity ceiling.
    #[must_use]
    pub fn with_ceiling_eligible_equity(mut self, ceiling: f64) -> Self {
        self.ceiling_eligible_equity = ceiling;
        self
    }

    /// Sets the standard ceiling.
    #[must_use]
    pub fn with_ceiling_standard(mut self, ceiling: f64) -> Self {
        self.ceiling_standard = ceiling;
        self
    }

    /// Replaces the eligible equity issuer list.
    #[must_use]
    pub fn with_eligible_equity_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_equity_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cumulative concentration threshold.
    #[must_use]
    pub fn with_concentration_threshold(mut self, threshold: f64) -> Self {
        self.concentration_threshold = threshold;
        self
    }

    /// Returns true if the issuer is on the eligible equity list.
    #[must_use]
    pub fn is_eligible_equity(&self, issuer_id: &str) -> bool {
        self.eligible_equity_issuers.contains(issuer_id)
    }

    /// Parses a comma-separated issuer list, dropping blank entries.
    ///
    /// ```
    /// use opcvm_compliance::ComplianceParams;
    ///
    /// let ids = ComplianceParams::parse_issuer_list(" ATW, IAM,, BCP ");
    /// assert_eq!(ids, vec!["ATW", "IAM", "BCP"]);
    /// ```
    #[must_use]
    pub fn parse_issuer_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ComplianceParams::default();
        assert_eq!(params.ceiling_sovereign, 1.0);
        assert_eq!(params.ceiling_eligible_equity, 0.15);
        assert_eq!(params.ceiling_standard, 0.10);
        assert_eq!(params.concentration_threshold, 0.45);
        for id in ["ATW", "IAM", "BCP", "BOA"] {
            assert!(params.is_eligible_equity(id));
        }
        assert!(!params.is_eligible_equity("CIH"));
    }

    #[test]
    fn test_builder_pattern() {
        let params = ComplianceParams::new()
            .with_ceiling_standard(0.05)
            .with_ceiling_eligible_equity(0.20)
            .with_eligible_equity_issuers(["CIH"])
            .with_concentration_threshold(0.40);

        assert_eq!(params.ceiling_standard, 0.05);
        assert_eq!(params.ceiling_eligible_equity, 0.20);
        assert_eq!(params.concentration_threshold, 0.40);
        assert!(params.is_eligible_equity("CIH"));
        assert!(!params.is_eligible_equity("ATW"));
    }

    #[test]
    fn test_serde_partial() {
        let parsed: ComplianceParams =
            serde_json::from_str(r#"{"ceiling_standard": 0.08}"#).unwrap();
        assert_eq!(parsed.ceiling_standard, 0.08);
        assert_eq!(parsed.ceiling_eligible_equity, 0.15);
        assert_eq!(parsed.eligible_equity_issuers.len(), 4);
    }
}
