//! Per-issuer exposure ratios.

use super::{eligible_funds, skipped_funds};
use crate::types::{
    CeilingKind, ComplianceParams, RatioRecord, ALERT_DEVIATION_PCT, COMPLIANCE_TOLERANCE,
};
use opcvm_core::{Holding, IssuerCategory, NetAssetsMap, SOVEREIGN_ISSUER};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Selects the ceiling applicable to an issuer.
///
/// Priority order:
///
/// 1. Sovereign issuer or public category: `ceiling_sovereign`
/// 2. Equity position in an eligible issuer: `ceiling_eligible_equity`
/// 3. Anything else: `ceiling_standard`
#[must_use]
pub fn select_ceiling(
    issuer_id: &str,
    category: IssuerCategory,
    is_equity: bool,
    params: &ComplianceParams,
) -> (f64, CeilingKind) {
    if issuer_id == SOVEREIGN_ISSUER || category == IssuerCategory::Public {
        (params.ceiling_sovereign, CeilingKind::Sovereign)
    } else if is_equity && params.is_eligible_equity(issuer_id) {
        (params.ceiling_eligible_equity, CeilingKind::EligibleEquity)
    } else {
        (params.ceiling_standard, CeilingKind::Standard)
    }
}

/// Returns true if `ratio` does not exceed `ceiling` beyond the tolerance.
///
/// ```
/// use opcvm_compliance::{is_within_ceiling, COMPLIANCE_TOLERANCE};
///
/// assert!(is_within_ceiling(0.15, 0.15));
/// assert!(is_within_ceiling(0.15 + COMPLIANCE_TOLERANCE / 2.0, 0.15));
/// assert!(!is_within_ceiling(0.15 + 2.0 * COMPLIANCE_TOLERANCE, 0.15));
/// ```
#[must_use]
pub fn is_within_ceiling(ratio: f64, ceiling: f64) -> bool {
    ratio <= ceiling + COMPLIANCE_TOLERANCE
}

struct IssuerGroup {
    category: IssuerCategory,
    total_value: f64,
    is_equity: bool,
    holding_count: usize,
}

/// Computes one [`RatioRecord`] per (fund, issuer) pair.
///
/// Funds appear in the order of their first holding; issuers within a fund
/// are sorted by id. Funds with missing or non-positive net assets produce
/// no record. Holdings without a resolved issuer are grouped under the
/// needs-review id.
#[must_use]
pub fn calculate_issuer_ratios(
    holdings: &[Holding],
    net_assets: &NetAssetsMap,
    params: &ComplianceParams,
) -> Vec<RatioRecord> {
    for (fund_id, na) in skipped_funds(holdings, net_assets) {
        match na {
            Some(na) => warn!(fund = fund_id, net_assets = na, "Skipping fund with non-positive net assets"),
            None => warn!(fund = fund_id, "Skipping fund without net assets"),
        }
    }

    let mut records = Vec::new();

    for (fund_id, fund_net_assets) in eligible_funds(holdings, net_assets) {
        let mut groups: BTreeMap<&str, IssuerGroup> = BTreeMap::new();

        for h in holdings.iter().filter(|h| h.fund_id == fund_id) {
            let group = groups.entry(h.issuer_id()).or_insert_with(|| IssuerGroup {
                category: h.issuer_category(),
                total_value: 0.0,
                is_equity: false,
                holding_count: 0,
            });
            group.total_value += h.value;
            group.is_equity |= h.is_equity();
            group.holding_count += 1;
        }

        debug!(fund = fund_id, issuers = groups.len(), "Computing issuer ratios");

        for (issuer_id, group) in groups {
            let ratio = group.total_value / fund_net_assets;
            let (ceiling, ceiling_kind) =
                select_ceiling(issuer_id, group.category, group.is_equity, params);
            let deviation = (ratio - ceiling) * 100.0;

            records.push(RatioRecord {
                fund_id: fund_id.to_string(),
                issuer_id: issuer_id.to_string(),
                issuer_category: group.category,
                total_value: group.total_value,
                net_assets: fund_net_assets,
                ratio,
                ceiling,
                ceiling_kind,
                is_equity: group.is_equity,
                holding_count: group.holding_count,
                is_compliant: is_within_ceiling(ratio, ceiling),
                deviation,
                alert: deviation > ALERT_DEVIATION_PCT,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use opcvm_core::IssuerMatch;

    fn holding(fund: &str, kind: &str, issuer: IssuerMatch, value: f64) -> Holding {
        Holding::new(fund, kind, "desc", value).with_issuer(issuer)
    }

    fn private(id: &str) -> IssuerMatch {
        IssuerMatch::new(id, IssuerCategory::Private)
    }

    fn fund_assets(fund: &str, value: f64) -> NetAssetsMap {
        let mut na = NetAssetsMap::new();
        na.insert(fund.to_string(), value);
        na
    }

    #[test]
    fn test_select_ceiling_priority() {
        let params = ComplianceParams::default();

        assert_eq!(
            select_ceiling(SOVEREIGN_ISSUER, IssuerCategory::Private, true, &params).1,
            CeilingKind::Sovereign
        );
        assert_eq!(
            select_ceiling("ONCF", IssuerCategory::Public, false, &params).1,
            CeilingKind::Sovereign
        );
        assert_eq!(
            select_ceiling("ATW", IssuerCategory::Private, true, &params),
            (0.15, CeilingKind::EligibleEquity)
        );
        assert_eq!(
            select_ceiling("ATW", IssuerCategory::Private, false, &params),
            (0.10, CeilingKind::Standard)
        );
        assert_eq!(
            select_ceiling("CIH", IssuerCategory::Private, true, &params),
            (0.10, CeilingKind::Standard)
        );
    }

    #[test]
    fn test_grouping_and_ratio() {
        let holdings = vec![
            holding("F", "ACTION", private("ATW"), 100_000.0),
            holding("F", "OBLIGATION", private("ATW"), 40_000.0),
            holding("F", "OBLIGATION", private("CIH"), 50_000.0),
        ];
        let ratios = calculate_issuer_ratios(
            &holdings,
            &fund_assets("F", 1_000_000.0),
            &ComplianceParams::default(),
        );

        assert_eq!(ratios.len(), 2);
        let atw = &ratios[0];
        assert_eq!(atw.issuer_id, "ATW");
        assert_eq!(atw.holding_count, 2);
        assert!(atw.is_equity);
        assert_relative_eq!(atw.total_value, 140_000.0);
        assert_relative_eq!(atw.ratio, 0.14);
        assert_eq!(atw.ceiling_kind, CeilingKind::EligibleEquity);
        assert!(atw.is_compliant);
        assert!(!atw.alert);

        let cih = &ratios[1];
        assert!(!cih.is_equity);
        assert_eq!(cih.ceiling_kind, CeilingKind::Standard);
        assert_relative_eq!(cih.deviation, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_breach_sets_alert() {
        let holdings = vec![holding("F", "ACTION", private("CIH"), 120_000.0)];
        let ratios = calculate_issuer_ratios(
            &holdings,
            &fund_assets("F", 1_000_000.0),
            &ComplianceParams::default(),
        );

        assert!(!ratios[0].is_compliant);
        assert!(ratios[0].alert);
        assert_relative_eq!(ratios[0].deviation, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_small_breach_without_alert() {
        // 10.05%: outside tolerance, below the alert threshold
        let holdings = vec![holding("F", "ACTION", private("CIH"), 100_500.0)];
        let ratios = calculate_issuer_ratios(
            &holdings,
            &fund_assets("F", 1_000_000.0),
            &ComplianceParams::default(),
        );

        assert!(!ratios[0].is_compliant);
        assert!(!ratios[0].alert);
    }

    #[test]
    fn test_skips_funds_without_net_assets() {
        let holdings = vec![
            holding("F", "ACTION", private("ATW"), 10.0),
            holding("G", "ACTION", private("ATW"), 10.0),
        ];
        let ratios = calculate_issuer_ratios(
            &holdings,
            &fund_assets("F", 0.0),
            &ComplianceParams::default(),
        );
        assert!(ratios.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let params = ComplianceParams::default();
        assert!(calculate_issuer_ratios(&[], &fund_assets("F", 1.0), &params).is_empty());

        let holdings = vec![holding("F", "ACTION", private("ATW"), 10.0)];
        assert!(calculate_issuer_ratios(&holdings, &NetAssetsMap::new(), &params).is_empty());
    }

    #[test]
    fn test_unresolved_holdings_grouped_for_review() {
        let holdings = vec![Holding::new("F", "ACTION", "X", 10.0)];
        let ratios = calculate_issuer_ratios(
            &holdings,
            &fund_assets("F", 100.0),
            &ComplianceParams::default(),
        );
        assert_eq!(ratios[0].issuer_id, opcvm_core::NEEDS_REVIEW_ISSUER);
        assert_eq!(ratios[0].issuer_category, IssuerCategory::NeedsReview);
    }
}
