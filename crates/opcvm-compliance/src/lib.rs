//! # OPCVM Compliance
//!
//! Issuer concentration control for OPCVM (mutual fund) portfolios under
//! CDVM Circular 01-09, Article 6.
//!
//! The engine takes the holdings of one or more funds, attributes each line
//! to an issuer, and checks the resulting exposures against the regulatory
//! ceilings and the cumulative 45% rule.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: Every step is a function of its explicit inputs
//! - **No global state**: Ceilings and eligibility lists travel in [`ComplianceParams`]
//! - **Ordered issuer table**: The first matching keyword wins
//! - **Robust input**: Bad figures and unknown issuers never abort a run
//!
//! ## Pipeline
//!
//! 1. [`load_portfolio_from_sheets`] - sheets to holdings and fund net assets
//! 2. [`add_issuers`] - attach an issuer to each holding
//! 3. [`calculate_issuer_ratios`] - one [`RatioRecord`] per fund and issuer
//! 4. [`check_concentration_rule`] - one [`ConcentrationCheckResult`] per fund
//!
//! [`run_compliance_check`] runs steps 2-4 and builds a [`ComplianceSummary`].
//!
//! ## Quick Start
//!
//! ```rust
//! use opcvm_compliance::prelude::*;
//!
//! let holdings = vec![
//!     Holding::new("FUND A", "ACTION", "ATTIJARIWAFA BANK", 140_000.0),
//!     Holding::new("FUND A", "BDT", "BDT 5.2% 2030", 500_000.0),
//! ];
//! let mut net_assets = NetAssetsMap::new();
//! net_assets.insert("FUND A".to_string(), 1_000_000.0);
//!
//! let report = run_compliance_check(
//!     &holdings,
//!     &net_assets,
//!     &IssuerTable::default(),
//!     &ComplianceParams::default(),
//! );
//!
//! assert_eq!(report.ratios.len(), 2);
//! assert!(report.ratios.iter().all(|r| r.is_compliant));
//! ```
//!
//! ## Module Overview
//!
//! - [`issuers`] - Keyword table and issuer resolution
//! - [`loader`] - Sheet-to-holdings extraction
//! - [`rules`] - Ratio calculation and the concentration rule
//! - [`summary`] - Run-level indicators
//! - [`pipeline`] - One-call orchestration
//! - [`types`] - Parameters and result records

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod error;
pub mod issuers;
pub mod loader;
pub mod pipeline;
pub mod rules;
pub mod summary;
pub mod types;

// Re-export error types at crate root
pub use error::{ComplianceError, ComplianceResult};

// Re-export main types
pub use types::{
    CeilingKind, ComplianceParams, ConcentrationCheckResult, RatioRecord, ALERT_DEVIATION_PCT,
    COMPLIANCE_TOLERANCE, INDIVIDUAL_EXPOSURE_TRIGGER,
};

pub use issuers::{add_issuers, identify_issuer, IssuerRule, IssuerTable};

pub use loader::{
    load_portfolio_from_sheets, CellRef, LoadedPortfolio, RawSheet, SheetLayout, SkipReason,
    SkippedSheet, MIN_COLUMNS,
};

pub use rules::{
    calculate_issuer_ratios, check_concentration_rule, is_within_ceiling, select_ceiling,
};

pub use pipeline::{run_compliance_check, ComplianceReport};
pub use summary::ComplianceSummary;

/// Prelude module for convenient imports.
///
/// ```rust
/// use opcvm_compliance::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ComplianceError, ComplianceResult};
    pub use crate::issuers::{add_issuers, identify_issuer, IssuerRule, IssuerTable};
    pub use crate::loader::{load_portfolio_from_sheets, LoadedPortfolio, RawSheet, SheetLayout};
    pub use crate::pipeline::{run_compliance_check, ComplianceReport};
    pub use crate::rules::{calculate_issuer_ratios, check_concentration_rule};
    pub use crate::summary::ComplianceSummary;
    pub use crate::types::{
        CeilingKind, ComplianceParams, ConcentrationCheckResult, RatioRecord,
        COMPLIANCE_TOLERANCE,
    };

    // Re-export commonly used types from the core crate
    pub use opcvm_core::{
        clean_number, CellValue, FundInfo, Holding, IssuerCategory, IssuerMatch, NetAssetsMap,
        SOVEREIGN_ISSUER,
    };
}
