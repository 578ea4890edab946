//! File-level configuration of a control run.

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use opcvm_compliance::{CellRef, ComplianceParams, SheetLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which optional sheets an export workbook carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Adds a `Summary` sheet.
    pub include_summary: bool,

    /// Adds a `Non-compliant` sheet when at least one ratio breaches.
    pub include_non_compliant: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_non_compliant: true,
        }
    }
}

/// Complete configuration of a control run.
///
/// Every section is optional in a file; missing keys take the regulatory
/// defaults.
///
/// # Example
///
/// ```rust
/// use opcvm_config::{ControlConfig, Validate};
///
/// let config = ControlConfig::from_toml_str(r#"
///     issuer_table = "issuers.csv"
///
///     [params]
///     ceiling_standard = 0.08
///     eligible_equity_issuers = ["ATW", "IAM"]
///
///     [layout]
///     header_rows = 2
/// "#)?;
///
/// assert_eq!(config.params.ceiling_standard, 0.08);
/// assert_eq!(config.params.ceiling_eligible_equity, 0.15);
/// assert_eq!(config.layout.header_rows, 2);
/// assert!(config.is_valid());
/// # Ok::<(), opcvm_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Custom issuer keyword table (CSV). Built-in table when absent.
    pub issuer_table: Option<PathBuf>,

    /// Ceilings and eligibility.
    pub params: ComplianceParams,

    /// Workbook layout.
    pub layout: SheetLayout,

    /// Export options.
    pub export: ExportConfig,
}

impl ControlConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the compliance parameters.
    #[must_use]
    pub fn with_params(mut self, params: ComplianceParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the sheet layout.
    #[must_use]
    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the issuer table path.
    #[must_use]
    pub fn with_issuer_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.issuer_table = Some(path.into());
        self
    }

    /// Parses a TOML document without validating it.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parses a JSON document without validating it.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads and validates a configuration file.
    ///
    /// The format follows the extension: `.toml` or `.json`. A relative
    /// issuer table path is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let mut config = match extension(path).as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        if let (Some(table), Some(dir)) = (&config.issuer_table, path.parent()) {
            if table.is_relative() {
                config.issuer_table = Some(dir.join(table));
            }
        }

        config.validate_or_error()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the configuration as TOML.
    pub fn write_toml(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?).map_err(|e| ConfigError::io(path, e))
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn check_fraction(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::with_rule(
            field,
            format!("{} must be a fraction between 0 and 1", value),
            "valid_fraction",
        ));
    }
}

fn check_header_cell(
    errors: &mut Vec<ValidationError>,
    field: &str,
    cell: Option<CellRef>,
    header_rows: usize,
) {
    if let Some(cell) = cell {
        if cell.row >= header_rows {
            errors.push(ValidationError::with_rule(
                field,
                format!(
                    "Row {} is outside the {} header row(s)",
                    cell.row, header_rows
                ),
                "header_cell",
            ));
        }
    }
}

impl Validate for ComplianceParams {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_fraction(&mut errors, "params.ceiling_sovereign", self.ceiling_sovereign);
        check_fraction(
            &mut errors,
            "params.ceiling_eligible_equity",
            self.ceiling_eligible_equity,
        );
        check_fraction(&mut errors, "params.ceiling_standard", self.ceiling_standard);
        check_fraction(
            &mut errors,
            "params.concentration_threshold",
            self.concentration_threshold,
        );

        if self
            .eligible_equity_issuers
            .iter()
            .any(|id| id.trim().is_empty())
        {
            errors.push(ValidationError::new(
                "params.eligible_equity_issuers",
                "Issuer ids cannot be empty",
            ));
        }

        errors
    }
}

impl Validate for SheetLayout {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_header_cell(
            &mut errors,
            "layout.fund_name_cell",
            self.fund_name_cell,
            self.header_rows,
        );
        check_header_cell(
            &mut errors,
            "layout.net_assets_cell",
            self.net_assets_cell,
            self.header_rows,
        );

        for (fund, value) in &self.known_net_assets {
            if !value.is_finite() || *value <= 0.0 {
                errors.push(ValidationError::with_rule(
                    format!("layout.known_net_assets.{}", fund),
                    format!("Net assets must be positive, got {}", value),
                    "positive_net_assets",
                ));
            }
        }

        errors
    }
}

impl Validate for ControlConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.params.validate();
        errors.extend(self.layout.validate());
        errors
    }
}
