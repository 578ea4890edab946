//! One-call orchestration of a compliance run.

use crate::issuers::{add_issuers, IssuerTable};
use crate::rules::{calculate_issuer_ratios, check_concentration_rule};
use crate::summary::ComplianceSummary;
use crate::types::{ComplianceParams, ConcentrationCheckResult, RatioRecord};
use opcvm_core::{Holding, NetAssetsMap};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything produced by a compliance run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Holdings with their resolved issuer.
    pub holdings: Vec<Holding>,

    /// One record per (fund, issuer).
    pub ratios: Vec<RatioRecord>,

    /// One result per fund.
    pub concentration: Vec<ConcentrationCheckResult>,

    /// Headline figures.
    pub summary: ComplianceSummary,
}

impl ComplianceReport {
    /// Ratios above their ceiling.
    pub fn non_compliant(&self) -> impl Iterator<Item = &RatioRecord> {
        self.ratios.iter().filter(|r| !r.is_compliant)
    }

    /// Ratios flagged as alerts.
    pub fn alerts(&self) -> impl Iterator<Item = &RatioRecord> {
        self.ratios.iter().filter(|r| r.alert)
    }

    /// Holdings whose issuer still needs a manual review.
    pub fn unresolved_holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings
            .iter()
            .filter(|h| h.issuer_category().is_unresolved())
    }

    /// Returns true if no ratio was computed.
    ///
    /// Distinguishes a successful run over nothing usable from a failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// Returns true if any ratio or fund breaches a rule.
    #[must_use]
    pub fn has_breaches(&self) -> bool {
        !self.summary.is_fully_compliant()
    }
}

/// Resolves issuers, computes ratios, applies the concentration rule and
/// summarizes the run.
///
/// The input holdings are not modified.
#[must_use]
pub fn run_compliance_check(
    holdings: &[Holding],
    net_assets: &NetAssetsMap,
    table: &IssuerTable,
    params: &ComplianceParams,
) -> ComplianceReport {
    let holdings = add_issuers(holdings, table);
    let ratios = calculate_issuer_ratios(&holdings, net_assets, params);
    let concentration =
        check_concentration_rule(&ratios, &holdings, net_assets, params.concentration_threshold);
    let summary = ComplianceSummary::calculate(&ratios, &concentration);

    info!(
        ratios = summary.ratio_count,
        non_compliant = summary.non_compliant_count,
        funds = summary.fund_count,
        concentration_breaches = summary.concentration_breaches(),
        "Compliance run complete"
    );

    ComplianceReport {
        holdings,
        ratios,
        concentration,
        summary,
    }
}
