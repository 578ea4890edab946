//! Article 6 rules.
//!
//! - [`calculate_issuer_ratios`]: per-issuer exposure against its ceiling
//! - [`check_concentration_rule`]: cumulative weight of issuers above 10%
//!
//! Both skip funds whose net assets are missing or not strictly positive,
//! and both return an empty vector on empty input. Skipped funds are
//! reported once, by the ratio calculation.

mod concentration;
mod ratios;

pub use concentration::check_concentration_rule;
pub use ratios::{calculate_issuer_ratios, is_within_ceiling, select_ceiling};

use opcvm_core::{Holding, NetAssetsMap};

/// Fund ids of the holdings in first-appearance order.
fn fund_order(holdings: &[Holding]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for h in holdings {
        if !seen.contains(&h.fund_id.as_str()) {
            seen.push(&h.fund_id);
        }
    }
    seen
}

fn usable(net_assets: f64) -> bool {
    net_assets.is_finite() && net_assets > 0.0
}

/// Funds of the holdings in first-appearance order, paired with their
/// usable net assets.
pub(crate) fn eligible_funds<'a>(
    holdings: &'a [Holding],
    net_assets: &NetAssetsMap,
) -> Vec<(&'a str, f64)> {
    fund_order(holdings)
        .into_iter()
        .filter_map(|fund_id| match net_assets.get(fund_id) {
            Some(&na) if usable(na) => Some((fund_id, na)),
            _ => None,
        })
        .collect()
}

/// Funds left out by [`eligible_funds`], with the net assets found if any.
pub(crate) fn skipped_funds<'a>(
    holdings: &'a [Holding],
    net_assets: &NetAssetsMap,
) -> Vec<(&'a str, Option<f64>)> {
    fund_order(holdings)
        .into_iter()
        .map(|fund_id| (fund_id, net_assets.get(fund_id).copied()))
        .filter(|(_, na)| !na.is_some_and(usable))
        .collect()
}
