//! # OPCVM Ext File
//!
//! File boundary of the OPCVM issuer-ratio control.
//!
//! This crate keeps every I/O concern out of the engine:
//! - Portfolio workbooks (`.xlsx`, `.xls`, `.ods`) read with `calamine`
//! - Issuer keyword tables stored as CSV
//! - Report export to `.xlsx` (`rust_xlsxwriter`) and CSV
//! - A content-addressed cache of parsed workbooks

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod error;
mod export;
mod issuer_table;
mod workbook;

pub use cache::*;
pub use error::*;
pub use export::*;
pub use issuer_table::*;
pub use workbook::*;
