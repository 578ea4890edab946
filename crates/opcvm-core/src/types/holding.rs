//! Portfolio holdings and fund information.

use super::{IssuerCategory, IssuerMatch};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net asset value per fund id.
pub type NetAssetsMap = HashMap<String, f64>;

/// Security-type marker identifying equity lines.
const EQUITY_MARKER: &str = "ACTION";

/// One line of a fund portfolio.
///
/// Created by the loader with `issuer == None`; the issuer resolver returns
/// annotated copies. Only strictly positive values survive loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Owning fund.
    pub fund_id: String,

    /// ISIN code, if present in the source.
    pub isin: Option<String>,

    /// Free-text security category (e.g. "ACTION", "OBLIGATION").
    pub security_type: String,

    /// Free-text security name, the source of issuer resolution.
    pub description: Option<String>,

    /// Number of units held.
    pub quantity: Option<f64>,

    /// Unit cost price.
    pub cost_price: Option<f64>,

    /// Global valuation in the fund's base currency.
    pub value: f64,

    /// Resolved issuer, once the issuer resolver has run.
    pub issuer: Option<IssuerMatch>,
}

impl Holding {
    /// Creates a holding without optional details.
    ///
    /// A blank description is stored as `None`.
    #[must_use]
    pub fn new(
        fund_id: impl Into<String>,
        security_type: impl Into<String>,
        description: impl Into<String>,
        value: f64,
    ) -> Self {
        let description: String = description.into();
        let description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        Self {
            fund_id: fund_id.into(),
            isin: None,
            security_type: security_type.into(),
            description,
            quantity: None,
            cost_price: None,
            value,
            issuer: None,
        }
    }

    /// Sets the ISIN code.
    #[must_use]
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the unit cost price.
    #[must_use]
    pub fn with_cost_price(mut self, price: f64) -> Self {
        self.cost_price = Some(price);
        self
    }

    /// Sets the resolved issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: IssuerMatch) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Returns true if the security type marks an equity line.
    #[must_use]
    pub fn is_equity(&self) -> bool {
        self.security_type.to_uppercase().contains(EQUITY_MARKER)
    }

    /// Returns the resolved issuer id, or the needs-review id if unresolved.
    #[must_use]
    pub fn issuer_id(&self) -> &str {
        self.issuer
            .as_ref()
            .map_or(super::NEEDS_REVIEW_ISSUER, |m| m.issuer_id.as_str())
    }

    /// Returns the resolved issuer category, or needs-review if unresolved.
    #[must_use]
    pub fn issuer_category(&self) -> IssuerCategory {
        self.issuer
            .as_ref()
            .map_or(IssuerCategory::NeedsReview, |m| m.category)
    }
}

/// A fund and its net asset value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundInfo {
    /// Fund identifier (unique within one loaded file).
    pub fund_id: String,

    /// Net asset value, the denominator of every ratio.
    pub net_assets: f64,

    /// Sheet the fund was read from.
    pub sheet_name: Option<String>,
}

impl FundInfo {
    /// Creates fund information.
    #[must_use]
    pub fn new(fund_id: impl Into<String>, net_assets: f64) -> Self {
        Self {
            fund_id: fund_id.into(),
            net_assets,
            sheet_name: None,
        }
    }

    /// Sets the source sheet name.
    #[must_use]
    pub fn with_sheet_name(mut self, sheet: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet.into());
        self
    }

    /// Returns true if ratios can be computed against this fund.
    #[must_use]
    pub fn has_positive_net_assets(&self) -> bool {
        self.net_assets.is_finite() && self.net_assets > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SOVEREIGN_ISSUER;

    #[test]
    fn test_blank_description_is_none() {
        let h = Holding::new("F", "ACTION", "   ", 10.0);
        assert!(h.description.is_none());
        let h = Holding::new("F", "ACTION", "IAM", 10.0);
        assert_eq!(h.description.as_deref(), Some("IAM"));
    }

    #[test]
    fn test_is_equity_case_insensitive() {
        assert!(Holding::new("F", "Actions cotées", "X", 1.0).is_equity());
        assert!(Holding::new("F", "ACTION", "X", 1.0).is_equity());
        assert!(!Holding::new("F", "OBLIGATION", "X", 1.0).is_equity());
    }

    #[test]
    fn test_issuer_defaults() {
        let h = Holding::new("F", "TCN", "X", 1.0);
        assert_eq!(h.issuer_category(), IssuerCategory::NeedsReview);

        let h = h.with_issuer(IssuerMatch::sovereign());
        assert_eq!(h.issuer_id(), SOVEREIGN_ISSUER);
        assert_eq!(h.issuer_category(), IssuerCategory::Public);
    }

    #[test]
    fn test_fund_info() {
        assert!(FundInfo::new("F", 1.0).has_positive_net_assets());
        assert!(!FundInfo::new("F", 0.0).has_positive_net_assets());
        assert!(!FundInfo::new("F", f64::NAN).has_positive_net_assets());
        let f = FundInfo::new("F", 5.0).with_sheet_name("Sheet1");
        assert_eq!(f.sheet_name.as_deref(), Some("Sheet1"));
    }
}
