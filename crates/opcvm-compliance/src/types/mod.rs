//! Parameters and result records of a compliance run.

mod params;
mod records;

pub use params::*;
pub use records::*;

/// Margin added to every ceiling before comparison.
///
/// Absorbs floating-point noise so that an exposure exactly at its ceiling
/// passes.
pub const COMPLIANCE_TOLERANCE: f64 = 1e-4;

/// Individual exposure above which an issuer counts toward the 45% rule.
///
/// Fixed by the regulation; independent of [`ComplianceParams::ceiling_standard`].
pub const INDIVIDUAL_EXPOSURE_TRIGGER: f64 = 0.10;

/// Deviation, in percentage points, above which a breach is flagged as an alert.
pub const ALERT_DEVIATION_PCT: f64 = 0.1;
