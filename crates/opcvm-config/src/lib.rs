//! OPCVM Configuration Layer
//!
//! File-level configuration of an issuer-ratio control run: regulatory
//! ceilings, workbook layout, the optional custom issuer table and export
//! options.
//!
//! # Features
//!
//! - **TOML and JSON**: format chosen by file extension
//! - **Defaults everywhere**: any missing key takes the regulatory default
//! - **Validation**: the [`Validate`] trait reports every problem at once
//!
//! # Example
//!
//! ```rust
//! use opcvm_config::{ControlConfig, Validate};
//!
//! let config = ControlConfig::default();
//! assert!(config.is_valid());
//! assert_eq!(config.params.concentration_threshold, 0.45);
//!
//! let text = config.to_toml_string().unwrap();
//! assert!(text.contains("[params]"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod control;
pub mod error;

pub use control::{ControlConfig, ExportConfig};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
