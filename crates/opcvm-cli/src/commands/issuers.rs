//! Issuers command implementation.
//!
//! Shows the keyword table in match order, or resolves descriptions against it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::resolve_issuer_table;
use crate::output::print_output;

/// Arguments for the issuers command.
#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// Custom issuer keyword table (CSV: keyword,issuer,category)
    #[arg(short, long)]
    pub issuers: Option<PathBuf>,

    /// Resolve these security descriptions instead of listing the table
    #[arg(short, long, num_args = 1..)]
    pub resolve: Vec<String>,
}

/// Keyword table row for display.
#[derive(Tabled, Serialize)]
struct RuleRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Keyword")]
    keyword: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Resolution row for display.
#[derive(Tabled, Serialize)]
struct ResolutionRow {
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Execute the issuers command.
pub fn execute(args: IssuersArgs, format: OutputFormat) -> Result<()> {
    let table = resolve_issuer_table(args.issuers.as_deref())?;

    if args.resolve.is_empty() {
        let rows: Vec<RuleRow> = table
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| RuleRow {
                position: i + 1,
                keyword: rule.keyword.clone(),
                issuer: rule.issuer_id.clone(),
                category: rule.category.label().to_string(),
            })
            .collect();
        return print_output(&rows, format);
    }

    let rows: Vec<ResolutionRow> = args
        .resolve
        .iter()
        .map(|description| {
            let m = table.identify(Some(description));
            ResolutionRow {
                description: description.clone(),
                issuer: m.issuer_id,
                category: m.category.label().to_string(),
            }
        })
        .collect();
    print_output(&rows, format)
}
