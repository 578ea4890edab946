//! Description-to-issuer resolution.

use super::IssuerTable;
use opcvm_core::{Holding, IssuerMatch};
use tracing::debug;

/// Treasury-bill code; always sovereign.
const TREASURY_BILL_CODE: &str = "BDT";

/// Bond marker used together with a state marker for state bonds.
const BOND_MARKER: &str = "OBL";

/// State markers accepted after [`BOND_MARKER`].
const STATE_MARKERS: [&str; 2] = ["ETAT", "ÉTAT"];

/// Resolves a security description to an issuer.
///
/// Resolution order:
///
/// 1. Missing or blank description: `("Unknown", unknown)`
/// 2. Description containing `BDT`: the sovereign issuer
/// 3. First table rule whose keyword occurs in the description
/// 4. Description containing `OBL` and `ETAT`/`ÉTAT`: the sovereign issuer
/// 5. Otherwise `("Needs review", needs review)`
///
/// All comparisons are made on upper-cased text.
///
/// # Examples
///
/// ```
/// use opcvm_compliance::{identify_issuer, IssuerTable};
/// use opcvm_core::{IssuerCategory, SOVEREIGN_ISSUER};
///
/// let table = IssuerTable::default();
///
/// let m = identify_issuer(Some("Maroc Telecom (IAM)"), &table);
/// assert_eq!(m.issuer_id, "IAM");
///
/// let m = identify_issuer(Some("bdt 52s 2030"), &table);
/// assert_eq!(m.issuer_id, SOVEREIGN_ISSUER);
///
/// let m = identify_issuer(Some("SOCIETE INCONNUE"), &table);
/// assert_eq!(m.category, IssuerCategory::NeedsReview);
/// ```
#[must_use]
pub fn identify_issuer(description: Option<&str>, table: &IssuerTable) -> IssuerMatch {
    let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
        return IssuerMatch::unknown();
    };

    let upper = description.to_uppercase();

    if upper.contains(TREASURY_BILL_CODE) {
        return IssuerMatch::sovereign();
    }

    if let Some(rule) = table.first_match(&upper) {
        return rule.to_match();
    }

    if upper.contains(BOND_MARKER) && STATE_MARKERS.iter().any(|m| upper.contains(m)) {
        return IssuerMatch::sovereign();
    }

    IssuerMatch::needs_review()
}

/// Returns copies of the holdings with their issuer resolved.
///
/// The input slice is left untouched and can be reused with another table.
#[must_use]
pub fn add_issuers(holdings: &[Holding], table: &IssuerTable) -> Vec<Holding> {
    let annotated: Vec<Holding> = holdings
        .iter()
        .map(|h| {
            let issuer = identify_issuer(h.description.as_deref(), table);
            h.clone().with_issuer(issuer)
        })
        .collect();

    let unresolved = annotated
        .iter()
        .filter(|h| h.issuer_category().is_unresolved())
        .count();
    debug!(
        holdings = annotated.len(),
        unresolved, "Resolved issuers for holdings"
    );

    annotated
}
