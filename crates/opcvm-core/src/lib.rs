//! # OPCVM Core
//!
//! Core types and helpers shared by the OPCVM issuer-ratio control crates.
//!
//! This crate provides the foundational building blocks used by the compliance
//! engine and its file adapters:
//!
//! - **Types**: `CellValue`, `Holding`, `FundInfo`, `IssuerCategory`, `IssuerMatch`
//! - **Number normalization**: Locale-tolerant parsing of spreadsheet figures
//! - **Formatting**: Percentage and amount rendering for reports
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: Nothing here performs I/O or reads global state
//! - **Robust parsing**: Malformed figures degrade to zero instead of aborting a run
//! - **Explicit Over Implicit**: Sentinel issuers are named constants, not magic strings
//!
//! ## Example
//!
//! ```rust
//! use opcvm_core::prelude::*;
//!
//! let value = clean_number(&CellValue::from("1 234 567,00"));
//! assert_eq!(value, 123456700.0);
//!
//! let holding = Holding::new("FUND A", "ACTION", "ATTIJARIWAFA BANK", 140_000.0);
//! assert!(holding.is_equity());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod format;
pub mod numbers;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::format::{format_amount, format_percent};
    pub use crate::numbers::{clean_number, normalize_number, NumberQuality};
    pub use crate::types::{
        CellValue, FundInfo, Holding, IssuerCategory, IssuerMatch, NetAssetsMap,
        NEEDS_REVIEW_ISSUER, SOVEREIGN_ISSUER, UNKNOWN_ISSUER,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use numbers::{clean_number, normalize_number, NumberQuality};
pub use types::{
    CellValue, FundInfo, Holding, IssuerCategory, IssuerMatch, NetAssetsMap,
    NEEDS_REVIEW_ISSUER, SOVEREIGN_ISSUER, UNKNOWN_ISSUER,
};
