//! Issuer resolution.
//!
//! Security descriptions are mapped to issuers through an ordered keyword
//! table. Order is part of the contract: the first rule whose keyword occurs
//! in the description wins, so more specific keywords must come first.
//!
//! Treasury bills (`BDT`) are recognized before the table is consulted and
//! always resolve to the sovereign issuer, whatever the table contains.

mod resolver;
mod table;

pub use resolver::*;
pub use table::*;
