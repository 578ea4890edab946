//! Domain types for issuer-ratio control.
//!
//! - [`CellValue`]: A raw spreadsheet cell as handed over by a file adapter
//! - [`Holding`]: One line of a fund portfolio
//! - [`FundInfo`]: A fund and its net asset value
//! - [`IssuerCategory`] / [`IssuerMatch`]: Issuer classification

mod cell;
mod holding;
mod issuer;

pub use cell::*;
pub use holding::*;
pub use issuer::*;
