//! The cumulative 45% rule.

use super::{eligible_funds, is_within_ceiling};
use crate::types::{ConcentrationCheckResult, RatioRecord, INDIVIDUAL_EXPOSURE_TRIGGER};
use opcvm_core::{Holding, NetAssetsMap, SOVEREIGN_ISSUER};
use tracing::debug;

/// Checks the cumulative weight of large equity issuers, one result per fund.
///
/// An issuer counts toward the sum when its ratio is strictly above
/// [`INDIVIDUAL_EXPOSURE_TRIGGER`], it is not the sovereign issuer, and it
/// has at least one equity holding in the fund ([`RatioRecord::is_equity`]).
/// The holdings only fix the fund order. The trigger is fixed and
/// does not follow any ceiling in the parameters.
///
/// Funds appear in the order of their first holding; funds with missing or
/// non-positive net assets produce no result.
#[must_use]
pub fn check_concentration_rule(
    ratios: &[RatioRecord],
    holdings: &[Holding],
    net_assets: &NetAssetsMap,
    threshold: f64,
) -> Vec<ConcentrationCheckResult> {
    eligible_funds(holdings, net_assets)
        .into_iter()
        .map(|(fund_id, fund_net_assets)| {
            let mut contributing_issuers: Vec<String> = Vec::new();
            let mut sum_above_threshold = 0.0;

            for record in ratios.iter().filter(|r| {
                r.fund_id == fund_id
                    && r.ratio > INDIVIDUAL_EXPOSURE_TRIGGER
                    && r.issuer_id != SOVEREIGN_ISSUER
                    && r.is_equity
            }) {
                sum_above_threshold += record.total_value;
                if !contributing_issuers.contains(&record.issuer_id) {
                    contributing_issuers.push(record.issuer_id.clone());
                }
            }

            let cumulative_ratio = sum_above_threshold / fund_net_assets;
            debug!(
                fund = fund_id,
                cumulative_ratio,
                issuers = contributing_issuers.len(),
                "Checked concentration rule"
            );

            ConcentrationCheckResult {
                fund_id: fund_id.to_string(),
                net_assets: fund_net_assets,
                sum_above_threshold,
                cumulative_ratio,
                cumulative_ceiling: threshold,
                is_compliant: is_within_ceiling(cumulative_ratio, threshold),
                contributing_issuers,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::calculate_issuer_ratios;
    use crate::types::ComplianceParams;
    use approx::assert_relative_eq;
    use opcvm_core::{IssuerCategory, IssuerMatch};

    fn holding(kind: &str, issuer: &str, value: f64) -> Holding {
        let m = if issuer == SOVEREIGN_ISSUER {
            IssuerMatch::sovereign()
        } else {
            IssuerMatch::new(issuer, IssuerCategory::Private)
        };
        Holding::new("F", kind, "desc", value).with_issuer(m)
    }

    fn run(holdings: &[Holding], params: &ComplianceParams) -> Vec<ConcentrationCheckResult> {
        let mut na = NetAssetsMap::new();
        na.insert("F".into(), 1_000_000.0);
        let ratios = calculate_issuer_ratios(holdings, &na, params);
        check_concentration_rule(&ratios, holdings, &na, params.concentration_threshold)
    }

    #[test]
    fn test_only_large_equity_issuers_count() {
        let holdings = vec![
            holding("ACTION", "ATW", 140_000.0),
            holding("ACTION", "CIH", 90_000.0),
            holding("OBLIGATION", "ONCF", 120_000.0),
            holding("BDT", SOVEREIGN_ISSUER, 500_000.0),
        ];
        let results = run(&holdings, &ComplianceParams::default());

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.contributing_issuers, vec!["ATW".to_string()]);
        assert_relative_eq!(r.sum_above_threshold, 140_000.0);
        assert_relative_eq!(r.cumulative_ratio, 0.14);
        assert!(r.is_compliant);
    }

    #[test]
    fn test_breach_above_threshold() {
        let holdings = vec![
            holding("ACTION", "ATW", 150_000.0),
            holding("ACTION", "IAM", 150_000.0),
            holding("ACTION", "BCP", 120_000.0),
            holding("ACTION", "BOA", 110_000.0),
        ];
        let results = run(&holdings, &ComplianceParams::default());

        let r = &results[0];
        assert_eq!(r.issuer_count(), 4);
        assert_relative_eq!(r.cumulative_ratio, 0.53);
        assert!(!r.is_compliant);
    }

    #[test]
    fn test_exactly_ten_percent_excluded() {
        let holdings = vec![holding("ACTION", "ATW", 100_000.0)];
        let results = run(&holdings, &ComplianceParams::default());
        assert!(results[0].contributing_issuers.is_empty());
        assert_eq!(results[0].sum_above_threshold, 0.0);
        assert_eq!(results[0].cumulative_ratio, 0.0);
        assert!(results[0].is_compliant);
    }

    #[test]
    fn test_custom_threshold() {
        let holdings = vec![holding("ACTION", "ATW", 140_000.0)];
        let params = ComplianceParams::default().with_concentration_threshold(0.12);
        let results = run(&holdings, &params);
        assert!(!results[0].is_compliant);
        assert_eq!(results[0].cumulative_ceiling, 0.12);
    }

    #[test]
    fn test_equity_flag_read_from_ratio_record() {
        let record = |issuer: &str, is_equity: bool| RatioRecord {
            fund_id: "F".into(),
            issuer_id: issuer.into(),
            issuer_category: IssuerCategory::Private,
            total_value: 200_000.0,
            net_assets: 1_000_000.0,
            ratio: 0.20,
            ceiling: 0.10,
            ceiling_kind: crate::types::CeilingKind::Standard,
            is_equity,
            holding_count: 1,
            is_compliant: false,
            deviation: 10.0,
            alert: true,
        };
        let ratios = vec![record("ATW", true), record("ONCF", false)];
        // Holdings only order the funds; their categories are not rescanned
        let holdings = vec![Holding::new("F", "OBLIGATION", "desc", 1.0)];
        let mut na = NetAssetsMap::new();
        na.insert("F".into(), 1_000_000.0);

        let results = check_concentration_rule(&ratios, &holdings, &na, 0.45);
        assert_eq!(results[0].contributing_issuers, vec!["ATW".to_string()]);
        assert_relative_eq!(results[0].cumulative_ratio, 0.20);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(check_concentration_rule(&[], &[], &NetAssetsMap::new(), 0.45).is_empty());
    }
}
