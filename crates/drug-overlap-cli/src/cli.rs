//! CLI argument definitions for drug-overlap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use drug_overlap_core::ingest::RegistryFormat;

#[derive(Parser)]
#[command(
    name = "drug-overlap",
    version,
    about = "Reconcile two drug-name registries into a 1:1 match table",
    long_about = "Reconcile two independently curated drug-name registries.\n\n\
                  Records sharing an identifier are joined first; the rest are paired by\n\
                  a two-of-three vote over Jaro-Winkler, token-set and edit-distance\n\
                  similarity, then reduced to a one-to-one match table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare one left registry against one right registry.
    Compare(CompareArgs),

    /// Compare several left variants against one reference registry.
    Batch(BatchArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Left (query) registry CSV.
    #[arg(long, value_name = "PATH")]
    pub left: PathBuf,

    /// Right (reference) registry CSV.
    #[arg(long, value_name = "PATH")]
    pub right: PathBuf,

    /// Layout of the left registry file.
    #[arg(long = "left-format", value_enum, default_value = "standard")]
    pub left_format: FormatArg,

    /// Header of the shared identifier column (default: RxCUI).
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Two-column alias,canonical synonym CSV.
    #[arg(long, value_name = "PATH")]
    pub synonyms: Option<PathBuf>,

    /// Registry to borrow indications from for a names-only left side.
    #[arg(long = "indication-source", value_name = "PATH")]
    pub indication_source: Option<PathBuf>,

    /// Registry to borrow approval dates from for a names-only left side.
    #[arg(long = "approval-source", value_name = "PATH")]
    pub approval_source: Option<PathBuf>,

    /// Match table output path.
    #[arg(long, value_name = "PATH", default_value = "overlap.csv")]
    pub output: PathBuf,

    /// Run manifest path (default: output path with a .json extension).
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Jaro-Winkler vote threshold (0.0 - 1.0).
    #[arg(long, value_name = "SCORE")]
    pub jaro: Option<f64>,

    /// Token-Jaccard pre-filter threshold (0.0 - 1.0).
    #[arg(long, value_name = "SCORE")]
    pub jaccard: Option<f64>,

    /// Token-set ratio vote threshold (0 - 100).
    #[arg(long, value_name = "SCORE")]
    pub token: Option<u8>,

    /// Edit-distance ratio vote threshold (0 - 100).
    #[arg(long, value_name = "SCORE")]
    pub ratio: Option<u8>,

    /// TOML file supplying thresholds, synonyms and enrichment sources.
    ///
    /// Flags given on the command line take precedence over the file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// TOML file describing the reference registry and the left variants.
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,
}

/// Registry file layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Standard,
    NamesOnly,
}

impl From<FormatArg> for RegistryFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Standard => RegistryFormat::Standard,
            FormatArg::NamesOnly => RegistryFormat::NamesOnly,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
