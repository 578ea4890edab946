//! Report export to `.xlsx` workbooks and CSV.
//!
//! Workbook sheets, in order:
//!
//! | Sheet | Content | Present |
//! |-------|---------|---------|
//! | `Issuer ratios` | one row per (fund, issuer) | always |
//! | `Concentration rule` | one row per fund | always |
//! | `Non-compliant` | breaching ratios only | when any, if enabled |
//! | `Summary` | headline figures | if enabled |

use std::io::Write;
use std::path::Path;

use opcvm_compliance::{ComplianceReport, ComplianceSummary, ConcentrationCheckResult, RatioRecord};
use opcvm_config::ExportConfig;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::{FileError, FileResult};

/// Longest sheet name accepted by the xlsx format.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Sheet holding the ratio table.
pub const RATIOS_SHEET: &str = "Issuer ratios";
/// Sheet holding the concentration results.
pub const CONCENTRATION_SHEET: &str = "Concentration rule";
/// Sheet holding breaching ratios.
pub const NON_COMPLIANT_SHEET: &str = "Non-compliant";
/// Sheet holding the summary.
pub const SUMMARY_SHEET: &str = "Summary";

/// Truncates a sheet name to [`MAX_SHEET_NAME_LEN`] characters.
#[must_use]
pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

// =============================================================================
// TABLE DEFINITIONS
// =============================================================================

/// One exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    /// Text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
}

impl ExportCell {
    fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

fn text(s: impl Into<String>) -> ExportCell {
    ExportCell::Text(s.into())
}

fn yes_no(flag: bool) -> ExportCell {
    text(if flag { "yes" } else { "no" })
}

/// A table ready to be written as a sheet or a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    /// Column headers.
    pub headers: Vec<&'static str>,
    /// Data rows.
    pub rows: Vec<Vec<ExportCell>>,
}

impl ExportTable {
    /// Ratio table; percentages are exported in percent units.
    #[must_use]
    pub fn ratios<'a>(ratios: impl IntoIterator<Item = &'a RatioRecord>) -> Self {
        Self {
            headers: vec![
                "Fund",
                "Issuer",
                "Category",
                "Total value",
                "Net assets",
                "Ratio (%)",
                "Ceiling (%)",
                "Ceiling kind",
                "Equity",
                "Holdings",
                "Compliant",
                "Deviation (pp)",
                "Alert",
            ],
            rows: ratios
                .into_iter()
                .map(|r| {
                    vec![
                        text(&r.fund_id),
                        text(&r.issuer_id),
                        text(r.issuer_category.label()),
                        ExportCell::Number(r.total_value),
                        ExportCell::Number(r.net_assets),
                        ExportCell::Number(r.ratio * 100.0),
                        ExportCell::Number(r.ceiling * 100.0),
                        text(r.ceiling_kind.to_string()),
                        yes_no(r.is_equity),
                        ExportCell::Number(r.holding_count as f64),
                        yes_no(r.is_compliant),
                        ExportCell::Number(r.deviation),
                        yes_no(r.alert),
                    ]
                })
                .collect(),
        }
    }

    /// Concentration results.
    #[must_use]
    pub fn concentration(results: &[ConcentrationCheckResult]) -> Self {
        Self {
            headers: vec![
                "Fund",
                "Net assets",
                "Sum above 10%",
                "Cumulative ratio (%)",
                "Ceiling (%)",
                "Compliant",
                "Issuer count",
                "Contributing issuers",
            ],
            rows: results
                .iter()
                .map(|c| {
                    vec![
                        text(&c.fund_id),
                        ExportCell::Number(c.net_assets),
                        ExportCell::Number(c.sum_above_threshold),
                        ExportCell::Number(c.cumulative_ratio * 100.0),
                        ExportCell::Number(c.cumulative_ceiling * 100.0),
                        yes_no(c.is_compliant),
                        ExportCell::Number(c.issuer_count() as f64),
                        text(c.contributing_label()),
                    ]
                })
                .collect(),
        }
    }

    /// Summary as indicator/value pairs.
    #[must_use]
    pub fn summary(summary: &ComplianceSummary) -> Self {
        let count = |n: usize| ExportCell::Number(n as f64);
        let issuers = if summary.non_compliant_issuers.is_empty() {
            "None".to_string()
        } else {
            summary.non_compliant_issuers.join(", ")
        };

        Self {
            headers: vec!["Indicator", "Value"],
            rows: vec![
                vec![text("Ratios analysed"), count(summary.ratio_count)],
                vec![text("Compliant"), count(summary.compliant_count)],
                vec![text("Non-compliant"), count(summary.non_compliant_count)],
                vec![
                    text("Compliance rate (%)"),
                    ExportCell::Number(summary.compliance_rate_pct),
                ],
                vec![text("Sovereign ratios"), count(summary.sovereign_count)],
                vec![text("Private issuer ratios"), count(summary.private_count)],
                vec![text("Funds"), count(summary.fund_count)],
                vec![
                    text("Funds within the 45% rule"),
                    count(summary.concentration_compliant_funds),
                ],
                vec![text("Non-compliant issuers"), text(issuers)],
            ],
        }
    }

    /// Writes the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> FileResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(ExportCell::render))?;
        }
        writer.flush().map_err(|e| FileError::Csv(e.into()))?;
        Ok(())
    }

    fn write_sheet(&self, workbook: &mut Workbook, name: &str, header: &Format) -> FileResult<()> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(name))?;

        for (col, title) in self.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, header)?;
        }
        for (row_idx, row) in self.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    ExportCell::Text(s) => sheet.write_string(row_num, col as u16, s)?,
                    ExportCell::Number(n) => sheet.write_number(row_num, col as u16, *n)?,
                };
            }
        }
        sheet.autofit();
        Ok(())
    }
}

// =============================================================================
// WORKBOOK EXPORT
// =============================================================================

fn build_workbook(report: &ComplianceReport, options: &ExportConfig) -> FileResult<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    ExportTable::ratios(&report.ratios).write_sheet(&mut workbook, RATIOS_SHEET, &header)?;
    ExportTable::concentration(&report.concentration).write_sheet(
        &mut workbook,
        CONCENTRATION_SHEET,
        &header,
    )?;

    if options.include_non_compliant && report.non_compliant().next().is_some() {
        ExportTable::ratios(report.non_compliant()).write_sheet(
            &mut workbook,
            NON_COMPLIANT_SHEET,
            &header,
        )?;
    }

    if options.include_summary {
        ExportTable::summary(&report.summary).write_sheet(&mut workbook, SUMMARY_SHEET, &header)?;
    }

    Ok(workbook)
}

/// Exports a report to an `.xlsx` file.
pub fn export_workbook(
    report: &ComplianceReport,
    options: &ExportConfig,
    path: impl AsRef<Path>,
) -> FileResult<()> {
    let path = path.as_ref();
    build_workbook(report, options)?.save(path)?;
    info!(path = %path.display(), ratios = report.ratios.len(), "Exported report");
    Ok(())
}

/// Exports a report to in-memory `.xlsx` bytes.
pub fn export_workbook_to_buffer(
    report: &ComplianceReport,
    options: &ExportConfig,
) -> FileResult<Vec<u8>> {
    Ok(build_workbook(report, options)?.save_to_buffer()?)
}

/// Writes the ratio table as CSV.
pub fn write_ratios_csv<W: Write>(ratios: &[RatioRecord], writer: W) -> FileResult<()> {
    ExportTable::ratios(ratios).write_csv(writer)
}

/// Writes the concentration results as CSV.
pub fn write_concentration_csv<W: Write>(
    results: &[ConcentrationCheckResult],
    writer: W,
) -> FileResult<()> {
    ExportTable::concentration(results).write_csv(writer)
}
