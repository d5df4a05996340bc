//! CLI argument definitions.

use std::path::PathBuf;

use canje_model::Variant;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "canje",
    version,
    about = "Validate promotional-redemption survey exports",
    long_about = "Validate promotional-redemption survey exports against payout rules.\n\n\
                  Flags every survey whose delivered promotional count does not match the\n\
                  purchase amount and writes an annotated result, an error report and one\n\
                  filtered view per partition."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow survey IDs and other row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one survey export and write the report bundle.
    Validate(ValidateArgs),

    /// Print a built-in rule table as JSON.
    Rules(RulesArgs),

    /// List the built-in promotion variants.
    Variants,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Survey export (.csv, .xlsx, .xls, .ods).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Built-in promotion variant to validate against.
    #[arg(long = "variant", value_enum, default_value = "polo")]
    pub variant: VariantArg,

    /// Rule table JSON file (overrides --variant).
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Worksheet to read from a workbook (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// CSV field separator.
    #[arg(long = "separator", value_name = "CHAR", default_value = ",", value_parser = parse_separator)]
    pub separator: u8,

    /// Output directory (default: <INPUT stem>_validado next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Number of error rows to preview on the console.
    #[arg(long = "show-errors", value_name = "N", default_value_t = 10)]
    pub show_errors: usize,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Variant whose rule table to print.
    #[arg(long = "variant", value_enum, default_value = "polo")]
    pub variant: VariantArg,
}

/// CLI variant choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Polo,
    TicketSorteo,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Polo => Variant::Polo,
            VariantArg::TicketSorteo => Variant::TicketSorteo,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_separator(value: &str) -> Result<u8, String> {
    let value = if value == "\\t" { "\t" } else { value };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("separator must be a single ASCII character, got '{value}'")),
    }
}
