//! Check command implementation.
//!
//! Loads a portfolio workbook and runs the issuer ratio and concentration
//! checks on it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use opcvm_compliance::{
    run_compliance_check, ComplianceParams, ComplianceReport, ComplianceSummary,
    ConcentrationCheckResult, RatioRecord, SkippedSheet, ALERT_DEVIATION_PCT,
};
use opcvm_config::{ControlConfig, Validate};
use opcvm_core::format::format_amount;
use opcvm_ext_file::{export_workbook, load_portfolio, write_ratios_csv};

use crate::cli::OutputFormat;
use crate::commands::{resolve_issuer_table, validate_fraction};
use crate::error::CliError;
use crate::output::{
    print_header, print_info, print_output, print_single, print_success, print_warning, KeyValue,
};

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Portfolio workbook, one sheet per fund (.xlsx)
    pub file: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(short, long, env = "OPCVM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Custom issuer keyword table (CSV: keyword,issuer,category)
    #[arg(short, long)]
    pub issuers: Option<PathBuf>,

    /// Ceiling for sovereign and public issuers (fraction, e.g. 1.0)
    #[arg(long)]
    pub ceiling_sovereign: Option<f64>,

    /// Ceiling for eligible equity issuers (fraction, e.g. 0.15)
    #[arg(long)]
    pub ceiling_eligible: Option<f64>,

    /// Ceiling for all other issuers (fraction, e.g. 0.10)
    #[arg(long)]
    pub ceiling_standard: Option<f64>,

    /// Eligible equity issuers, comma separated (e.g. ATW,IAM,BCP,BOA)
    #[arg(long)]
    pub eligible: Option<String>,

    /// Cumulative concentration threshold (fraction, e.g. 0.45)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Export the results to an .xlsx workbook
    #[arg(short = 'o', long)]
    pub export: Option<PathBuf>,

    /// Only list ratios above their ceiling
    #[arg(long)]
    pub only_breaches: bool,

    /// Exit with status 2 when any rule is breached
    #[arg(long)]
    pub fail_on_breach: bool,
}

impl CheckArgs {
    fn apply_overrides(&self, mut params: ComplianceParams) -> Result<ComplianceParams> {
        if let Some(v) = self.ceiling_sovereign {
            params.ceiling_sovereign = validate_fraction("sovereign ceiling", v)?;
        }
        if let Some(v) = self.ceiling_eligible {
            params.ceiling_eligible_equity = validate_fraction("eligible equity ceiling", v)?;
        }
        if let Some(v) = self.ceiling_standard {
            params.ceiling_standard = validate_fraction("standard ceiling", v)?;
        }
        if let Some(v) = self.threshold {
            params.concentration_threshold = validate_fraction("concentration threshold", v)?;
        }
        if let Some(ref list) = self.eligible {
            let ids = ComplianceParams::parse_issuer_list(list);
            if ids.is_empty() {
                return Err(CliError::EmptyIssuerList(list.clone()).into());
            }
            params = params.with_eligible_equity_issuers(ids);
        }
        Ok(params)
    }
}

/// Ratio result row for display.
#[derive(Tabled, Serialize)]
struct RatioRow {
    #[tabled(rename = "Fund")]
    fund: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Ratio")]
    ratio: String,
    #[tabled(rename = "Ceiling")]
    ceiling: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&RatioRecord> for RatioRow {
    fn from(r: &RatioRecord) -> Self {
        Self {
            fund: r.fund_id.clone(),
            issuer: r.issuer_id.clone(),
            category: r.issuer_category.label().to_string(),
            value: format_amount(r.total_value),
            ratio: r.ratio_pct(),
            ceiling: r.ceiling_pct(),
            deviation: r.deviation_pct(),
            status: match (r.is_compliant, r.alert) {
                (true, _) => "OK",
                (false, true) => "BREACH",
                (false, false) => "MARGINAL",
            },
        }
    }
}

/// Concentration result row for display.
#[derive(Tabled, Serialize)]
struct ConcentrationRow {
    #[tabled(rename = "Fund")]
    fund: String,
    #[tabled(rename = "Net assets")]
    net_assets: String,
    #[tabled(rename = "Sum > 10%")]
    sum: String,
    #[tabled(rename = "Cumulative")]
    cumulative: String,
    #[tabled(rename = "Ceiling")]
    ceiling: String,
    #[tabled(rename = "Issuers")]
    issuers: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&ConcentrationCheckResult> for ConcentrationRow {
    fn from(c: &ConcentrationCheckResult) -> Self {
        Self {
            fund: c.fund_id.clone(),
            net_assets: format_amount(c.net_assets),
            sum: format_amount(c.sum_above_threshold),
            cumulative: c.cumulative_ratio_pct(),
            ceiling: c.cumulative_ceiling_pct(),
            issuers: c.contributing_label(),
            status: if c.is_compliant { "OK" } else { "BREACH" },
        }
    }
}

/// JSON document of a check run.
#[derive(Serialize)]
struct CheckOutput<'a> {
    file: String,
    ratios: Vec<&'a RatioRecord>,
    concentration: &'a [ConcentrationCheckResult],
    summary: &'a ComplianceSummary,
    skipped_sheets: &'a [SkippedSheet],
    degraded_cells: usize,
    unresolved_holdings: usize,
}

fn summary_rows(summary: &ComplianceSummary) -> Vec<KeyValue> {
    let issuers = if summary.non_compliant_issuers.is_empty() {
        "None".to_string()
    } else {
        summary.non_compliant_issuers.join(", ")
    };

    vec![
        KeyValue::new("Ratios analysed", summary.ratio_count),
        KeyValue::new("Compliant", summary.compliant_count),
        KeyValue::new("Non-compliant", summary.non_compliant_count),
        KeyValue::new(
            "Compliance rate",
            format!("{:.1}%", summary.compliance_rate_pct),
        ),
        KeyValue::new("Sovereign ratios", summary.sovereign_count),
        KeyValue::new("Private issuer ratios", summary.private_count),
        KeyValue::new(
            "Funds within concentration rule",
            format!(
                "{} / {}",
                summary.concentration_compliant_funds, summary.fund_count
            ),
        ),
        KeyValue::new("Non-compliant issuers", issuers),
    ]
}

fn print_report(report: &ComplianceReport, ratios: &[&RatioRecord]) -> Result<()> {
    let rows: Vec<RatioRow> = ratios.iter().map(|r| RatioRow::from(*r)).collect();
    print_header("Issuer ratios");
    print_output(&rows, OutputFormat::Table)?;

    let rows: Vec<ConcentrationRow> = report.concentration.iter().map(Into::into).collect();
    print_header("Concentration rule");
    print_output(&rows, OutputFormat::Table)?;

    print_header("Summary");
    print_output(&summary_rows(&report.summary), OutputFormat::Table)?;
    Ok(())
}

/// Execute the check command.
///
/// Returns `false` when `--fail-on-breach` is set and a rule is breached.
pub fn execute(args: CheckArgs, format: OutputFormat, quiet: bool) -> Result<bool> {
    let config = match args.config {
        Some(ref path) => ControlConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ControlConfig::default(),
    };
    let params = args.apply_overrides(config.params.clone())?;
    params.validate_or_error()?;

    let table_path = args.issuers.as_deref().or(config.issuer_table.as_deref());
    let table = resolve_issuer_table(table_path)?;

    let loaded = load_portfolio(&args.file, &config.layout)
        .with_context(|| format!("Failed to load portfolio {}", args.file.display()))?;

    let report = run_compliance_check(
        &loaded.holdings,
        &loaded.net_assets(),
        &table,
        &params,
    );

    info!(
        file = %args.file.display(),
        ratios = report.ratios.len(),
        breaches = report.summary.non_compliant_count,
        "Check finished"
    );

    let unresolved = report.unresolved_holdings().count();
    if !quiet {
        for skipped in &loaded.skipped_sheets {
            print_warning(&format!(
                "Sheet '{}' skipped: {}",
                skipped.sheet_name, skipped.reason
            ));
        }
        if loaded.degraded_cells > 0 {
            print_warning(&format!(
                "{} valuation cell(s) could not be read and count as zero",
                loaded.degraded_cells
            ));
        }
        let alerts = report.alerts().count();
        if alerts > 0 {
            print_warning(&format!(
                "{} ratio(s) exceed their ceiling by more than {} point",
                alerts, ALERT_DEVIATION_PCT
            ));
        }
        if unresolved > 0 {
            print_warning(&format!(
                "{} holding(s) need a manual issuer review",
                unresolved
            ));
        }
    }

    let ratios: Vec<&RatioRecord> = if args.only_breaches {
        report.non_compliant().collect()
    } else {
        report.ratios.iter().collect()
    };

    match format {
        OutputFormat::Table => {
            if !quiet {
                print_info(&format!(
                    "{} holdings worth {} loaded from {} fund(s)",
                    loaded.holdings.len(),
                    format_amount(loaded.total_value()),
                    loaded.funds.len()
                ));
            }
            if report.is_empty() {
                print_warning("No ratio could be computed: check the funds' net assets");
            }
            print_report(&report, &ratios)?;
        }
        OutputFormat::Json => {
            let doc = CheckOutput {
                file: args.file.display().to_string(),
                ratios,
                concentration: &report.concentration,
                summary: &report.summary,
                skipped_sheets: &loaded.skipped_sheets,
                degraded_cells: loaded.degraded_cells,
                unresolved_holdings: unresolved,
            };
            print_single(&doc, format)?;
        }
        OutputFormat::Csv => {
            let owned: Vec<RatioRecord> = ratios.into_iter().cloned().collect();
            write_ratios_csv(&owned, std::io::stdout())?;
        }
    }

    if let Some(ref path) = args.export {
        export_workbook(&report, &config.export, path)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        if !quiet {
            print_success(&format!("Results exported to {}", path.display()));
        }
    }

    Ok(!(args.fail_on_breach && report.has_breaches()))
}
