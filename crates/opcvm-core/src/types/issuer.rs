//! Issuer classification.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issuer id of the Moroccan State (treasury bills and state bonds).
pub const SOVEREIGN_ISSUER: &str = "Sovereign";

/// Issuer id assigned when a holding has no description.
pub const UNKNOWN_ISSUER: &str = "Unknown";

/// Issuer id assigned when no keyword matches a description.
pub const NEEDS_REVIEW_ISSUER: &str = "Needs review";

/// Public/private classification of an issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuerCategory {
    /// State or state-guaranteed issuer.
    Public,
    /// Private issuer (corporates, banks, funds).
    Private,
    /// No keyword matched; requires manual review.
    NeedsReview,
    /// The holding carried no description at all.
    Unknown,
}

impl IssuerCategory {
    /// Returns the label used in reports and issuer tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::NeedsReview => "needs review",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for categories that were not resolved from the keyword table.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::NeedsReview | Self::Unknown)
    }
}

impl fmt::Display for IssuerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for IssuerCategory {
    type Err = CoreError;

    /// Parses a category label, accepting the French labels of older tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" | "prive" | "privé" => Ok(Self::Private),
            "needs review" | "needs_review" | "à vérifier" | "a verifier" | "a_verifier" => {
                Ok(Self::NeedsReview)
            }
            "unknown" => Ok(Self::Unknown),
            _ => Err(CoreError::unknown_category(s)),
        }
    }
}

/// Result of resolving a security description to an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerMatch {
    /// Canonical issuer id (e.g. `ATW`, `Sovereign`).
    pub issuer_id: String,
    /// Issuer category.
    pub category: IssuerCategory,
}

impl IssuerMatch {
    /// Creates a new issuer match.
    #[must_use]
    pub fn new(issuer_id: impl Into<String>, category: IssuerCategory) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            category,
        }
    }

    /// The sovereign pair.
    #[must_use]
    pub fn sovereign() -> Self {
        Self::new(SOVEREIGN_ISSUER, IssuerCategory::Public)
    }

    /// The pair used for holdings without a description.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ISSUER, IssuerCategory::Unknown)
    }

    /// The pair used when no keyword matches.
    #[must_use]
    pub fn needs_review() -> Self {
        Self::new(NEEDS_REVIEW_ISSUER, IssuerCategory::NeedsReview)
    }

    /// Returns true if this is the sovereign issuer.
    #[must_use]
    pub fn is_sovereign(&self) -> bool {
        self.issuer_id == SOVEREIGN_ISSUER
    }
}
