//! Config command implementation.
//!
//! Shows the effective configuration and writes default configuration files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use opcvm_config::ControlConfig;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_header, print_output, print_single, print_success, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Write a default configuration file (TOML)
    Init(InitArgs),
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file (.toml or .json); defaults when absent
    #[arg(short, long, env = "OPCVM_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination path
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn config_rows(config: &ControlConfig) -> Vec<KeyValue> {
    let params = &config.params;
    let layout = &config.layout;
    let cell = |c: Option<opcvm_compliance::CellRef>| {
        c.map_or_else(|| "none".to_string(), |c| format!("row {}, col {}", c.row, c.col))
    };

    vec![
        KeyValue::from_fraction("Sovereign ceiling", params.ceiling_sovereign),
        KeyValue::from_fraction("Eligible equity ceiling", params.ceiling_eligible_equity),
        KeyValue::from_fraction("Standard ceiling", params.ceiling_standard),
        KeyValue::new(
            "Eligible equity issuers",
            params
                .eligible_equity_issuers
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        ),
        KeyValue::from_fraction("Concentration threshold", params.concentration_threshold),
        KeyValue::new(
            "Issuer table",
            config
                .issuer_table
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        ),
        KeyValue::new("Header rows", layout.header_rows),
        KeyValue::new("Fund name cell", cell(layout.fund_name_cell)),
        KeyValue::new("Net assets cell", cell(layout.net_assets_cell)),
        KeyValue::new("Mapped sheets", layout.sheet_funds.len()),
        KeyValue::new("Known net assets", layout.known_net_assets.len()),
        KeyValue::new("Export summary sheet", config.export.include_summary),
        KeyValue::new("Export non-compliant sheet", config.export.include_non_compliant),
    ]
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    match args.command {
        ConfigCommand::Show(show) => {
            let config = match show.config {
                Some(ref path) => ControlConfig::from_file(path)?,
                None => ControlConfig::default(),
            };
            match format {
                OutputFormat::Table => {
                    print_header("Configuration");
                    print_output(&config_rows(&config), format)
                }
                OutputFormat::Json => print_single(&config, format),
                OutputFormat::Csv => print_output(&config_rows(&config), format),
            }
        }
        ConfigCommand::Init(init) => {
            if init.path.exists() && !init.force {
                return Err(CliError::FileExists(init.path.display().to_string()).into());
            }
            ControlConfig::default().write_toml(&init.path)?;
            if !quiet {
                print_success(&format!("Configuration written to {}", init.path.display()));
            }
            Ok(())
        }
    }
}
