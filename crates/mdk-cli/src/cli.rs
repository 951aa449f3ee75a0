//! CLI argument definitions for the microdata deposit tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mdk",
    version,
    about = "Prepare registry variables for encrypted microdata deposit",
    long_about = "Validate a wide registry table one variable at a time against the\n\
                  central metadata service, then seal each variable into an encrypted\n\
                  archive ready for deposit. One variable failing never stops the rest."
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

    /// Log output format (pretty for humans, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and package every variable of a source table.
    Run(RunArgs),

    /// List the variables a run would process, without fetching anything.
    Variables(VariablesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Source table CSV.
    #[arg(long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Metadata service base URL.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: String,

    /// Working directory for per-variable staging files.
    #[arg(long = "workdir", value_name = "DIR")]
    pub workdir: PathBuf,

    /// Output directory for sealed archives.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Directory holding the recipient public key (microdata_public_key.pem).
    #[arg(long = "key-dir", value_name = "DIR")]
    pub key_dir: PathBuf,

    /// Field delimiter of the source table, a single byte.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ";")]
    pub delimiter: String,

    /// Character encoding of the source table (WHATWG label).
    #[arg(long = "encoding", value_name = "LABEL", default_value = "utf-8")]
    pub encoding: String,

    /// Identifier or temporal column copied into every variable file
    /// instead of being deposited itself. Repeatable; naming the flag
    /// replaces the default set.
    #[arg(
        long = "exclude",
        value_name = "COLUMN",
        default_values = ["sidkrg", "start_time", "stop_time"]
    )]
    pub exclude: Vec<String>,

    /// Metadata request timeout in seconds.
    #[arg(
        long = "timeout-secs",
        value_name = "SECS",
        default_value_t = mdk_fetch::DEFAULT_TIMEOUT.as_secs()
    )]
    pub timeout_secs: u64,

    /// Write the run report as JSON to this path.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Stop after dataset validation; package nothing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct VariablesArgs {
    /// Source table CSV.
    #[arg(long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Metadata service base URL, used to render each variable's
    /// document URL. No request is made.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: String,

    /// Field delimiter of the source table, a single byte.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ";")]
    pub delimiter: String,

    /// Character encoding of the source table (WHATWG label).
    #[arg(long = "encoding", value_name = "LABEL", default_value = "utf-8")]
    pub encoding: String,

    /// Identifier or temporal column excluded from the listing.
    /// Repeatable; naming the flag replaces the default set.
    #[arg(
        long = "exclude",
        value_name = "COLUMN",
        default_values = ["sidkrg", "start_time", "stop_time"]
    )]
    pub exclude: Vec<String>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
