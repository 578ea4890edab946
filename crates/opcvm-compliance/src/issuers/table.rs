//! Ordered keyword table.

use crate::error::{ComplianceError, ComplianceResult};
use opcvm_core::{IssuerCategory, IssuerMatch, SOVEREIGN_ISSUER};
use serde::{Deserialize, Serialize};

/// One keyword-to-issuer mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerRule {
    /// Substring searched case-insensitively in descriptions.
    pub keyword: String,
    /// Issuer id returned on match.
    pub issuer_id: String,
    /// Issuer category returned on match.
    pub category: IssuerCategory,
}

impl IssuerRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        issuer_id: impl Into<String>,
        category: IssuerCategory,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            issuer_id: issuer_id.into(),
            category,
        }
    }

    /// Returns true if the keyword occurs in an already upper-cased description.
    #[must_use]
    pub fn matches_upper(&self, description_upper: &str) -> bool {
        description_upper.contains(&self.keyword.to_uppercase())
    }

    /// The issuer this rule resolves to.
    #[must_use]
    pub fn to_match(&self) -> IssuerMatch {
        IssuerMatch::new(self.issuer_id.clone(), self.category)
    }

    fn check(&self) -> ComplianceResult<()> {
        if self.keyword.trim().is_empty() {
            return Err(ComplianceError::invalid_rule(
                &self.keyword,
                "keyword cannot be empty",
            ));
        }
        if self.issuer_id.trim().is_empty() {
            return Err(ComplianceError::invalid_rule(
                &self.keyword,
                "issuer id cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Built-in keyword table for the Moroccan market, in match order.
const BUILTIN_RULES: &[(&str, &str, IssuerCategory)] = &[
    ("ATW", "ATW", IssuerCategory::Private),
    ("ATTIJARI", "ATW", IssuerCategory::Private),
    ("OBLATW", "ATW", IssuerCategory::Private),
    ("CD ATW", "ATW", IssuerCategory::Private),
    ("ARADEI", "ARADEI", IssuerCategory::Private),
    ("OBLARADEI", "ARADEI", IssuerCategory::Private),
    ("BCP", "BCP", IssuerCategory::Private),
    ("OBLBCP", "BCP", IssuerCategory::Private),
    ("IAM", "IAM", IssuerCategory::Private),
    ("ITISSALAT", "IAM", IssuerCategory::Private),
    ("ITIS SALAT", "IAM", IssuerCategory::Private),
    ("BOA", "BOA", IssuerCategory::Private),
    ("BANK OF AFRICA", "BOA", IssuerCategory::Private),
    ("CDM", "CDM", IssuerCategory::Private),
    ("CIH", "CIH", IssuerCategory::Private),
    ("MUTANDIS", "MUTANDIS", IssuerCategory::Private),
    ("LBV", "LBV", IssuerCategory::Private),
    ("LABEL VIE", "LBV", IssuerCategory::Private),
    ("COSUMAR", "COSUMAR", IssuerCategory::Private),
    ("CSR", "COSUMAR", IssuerCategory::Private),
    ("ONCF", "ONCF", IssuerCategory::Private),
    ("OBLONCF", "ONCF", IssuerCategory::Private),
    ("CAM", "CAM", IssuerCategory::Private),
    ("OBLCAM", "CAM", IssuerCategory::Private),
    ("RCI", "RCI", IssuerCategory::Private),
    ("BSFRCI", "RCI", IssuerCategory::Private),
    ("BDT", SOVEREIGN_ISSUER, IssuerCategory::Public),
    ("CFG", "CFG", IssuerCategory::Private),
    ("IRGAM", "IRGAM", IssuerCategory::Private),
    ("PRS", "CFG", IssuerCategory::Private),
    ("INSTICASH", "CFG", IssuerCategory::Private),
    ("TWIN", "TWIN", IssuerCategory::Private),
];

/// Ordered issuer keyword table.
///
/// Immutable once built; every rule has a non-empty keyword and issuer id.
///
/// # Examples
///
/// ```
/// use opcvm_compliance::{IssuerRule, IssuerTable};
/// use opcvm_core::IssuerCategory;
///
/// let table = IssuerTable::new(vec![
///     IssuerRule::new("ATTIJARI", "ATW", IssuerCategory::Private),
///     IssuerRule::new("MAROC TELECOM", "IAM", IssuerCategory::Private),
/// ])?;
///
/// assert_eq!(table.identify(Some("Attijariwafa Bank")).issuer_id, "ATW");
/// # Ok::<(), opcvm_compliance::ComplianceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IssuerRule>", into = "Vec<IssuerRule>")]
pub struct IssuerTable {
    rules: Vec<IssuerRule>,
}

impl IssuerTable {
    /// Builds a table from rules, keeping their order.
    pub fn new(rules: Vec<IssuerRule>) -> ComplianceResult<Self> {
        for rule in &rules {
            rule.check()?;
        }
        Ok(Self { rules })
    }

    /// The built-in Moroccan market table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(kw, id, cat)| IssuerRule::new(*kw, *id, *cat))
                .collect(),
        }
    }

    /// Rules in match order.
    #[must_use]
    pub fn rules(&self) -> &[IssuerRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule matching an upper-cased description.
    #[must_use]
    pub fn first_match(&self, description_upper: &str) -> Option<&IssuerRule> {
        self.rules.iter().find(|r| r.matches_upper(description_upper))
    }

    /// Resolves a description; see [`crate::identify_issuer`].
    #[must_use]
    pub fn identify(&self, description: Option<&str>) -> IssuerMatch {
        super::identify_issuer(description, self)
    }
}

impl Default for IssuerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<IssuerRule>> for IssuerTable {
    type Error = ComplianceError;

    fn try_from(rules: Vec<IssuerRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<IssuerTable> for Vec<IssuerRule> {
    fn from(table: IssuerTable) -> Self {
        table.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = IssuerTable::builtin();
        assert_eq!(table.len(), 32);
        assert_eq!(table.rules()[0].keyword, "ATW");
        assert!(table
            .rules()
            .iter()
            .any(|r| r.issuer_id == SOVEREIGN_ISSUER && r.category == IssuerCategory::Public));
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let err = IssuerTable::new(vec![IssuerRule::new(" ", "X", IssuerCategory::Private)]);
        assert!(err.is_err());
        let err = IssuerTable::new(vec![IssuerRule::new("X", "", IssuerCategory::Private)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_first_match_respects_order() {
        let table = IssuerTable::new(vec![
            IssuerRule::new("BANK", "GENERIC", IssuerCategory::Private),
            IssuerRule::new("BANK OF AFRICA", "BOA", IssuerCategory::Private),
        ])
        .unwrap();
        let rule = table.first_match("BANK OF AFRICA 2029").unwrap();
        assert_eq!(rule.issuer_id, "GENERIC");
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let rule = IssuerRule::new("label vie", "LBV", IssuerCategory::Private);
        assert!(rule.matches_upper("ACTIONS LABEL VIE"));
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[{"keyword":"","issuer_id":"X","category":"private"}]"#;
        assert!(serde_json::from_str::<IssuerTable>(json).is_err());

        let json = r#"[{"keyword":"CIH","issuer_id":"CIH","category":"private"}]"#;
        let table: IssuerTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 1);
    }
}
