//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for diagnostics and facets.
///
/// `Human` prints tagged lines to stderr. `Json` prints one JSON object per
/// diagnostic (NDJSON) and a single object for facets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// Arguments shared by every transform subcommand.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Path to a workbook (.xlsx, .xls, .ods) or delimited text file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    pub file: PathOrStdin,

    /// Write the output here instead of stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Header keywords a row must match to be taken as the header row.
    #[arg(long, value_name = "N")]
    pub header_threshold: Option<usize>,
}

/// All top-level subcommands exposed by the `imobi` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Build a styled price table grouped by stage and block.
    PriceTable {
        #[command(flatten)]
        input: InputArgs,
        /// Assign a block to a stage, as `BLOCK=STAGE` (repeatable).
        #[arg(long = "stage", value_name = "BLOCK=STAGE")]
        stages: Vec<String>,
        /// JSON object file mapping original block text to a stage title.
        #[arg(long, value_name = "FILE", conflicts_with = "stages")]
        stage_map: Option<PathBuf>,
    },

    /// Build a lot table with one monthly installment column per year.
    LotInstallments {
        #[command(flatten)]
        input: InputArgs,
        /// Months over which the first year's installment is computed.
        #[arg(long, value_name = "N")]
        months: u32,
        /// Yearly readjustment of the installment, in percent.
        #[arg(long, value_name = "PERCENT")]
        annual_interest: f64,
        /// Number of yearly installment columns (1 to 100).
        #[arg(long, value_name = "N")]
        years: u32,
    },

    /// Build the `;`-separated unit import file for the Sienge ERP.
    SiengeUnits {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Build the normalized incorporation registry with ideal fractions.
    Incorporation {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Filter a blocked-units report.
    BlockedUnits {
        #[command(flatten)]
        input: InputArgs,
        /// Drop rows of this project (repeatable).
        #[arg(long, value_name = "PROJECT")]
        ignore_project: Vec<String>,
        /// Drop rows with this reason; `<EMPTY>` matches a blank reason (repeatable).
        #[arg(long, value_name = "REASON")]
        ignore_reason: Vec<String>,
    },

    /// List the projects and reasons of a blocked-units report.
    Facets {
        /// Path to a blocked-units report, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Header keywords a row must match to be taken as the header row.
        #[arg(long, value_name = "N")]
        header_threshold: Option<usize>,
    },
}

/// Normalize real-estate price lists and unit registries.
#[derive(Parser)]
#[command(
    name = "imobi",
    version,
    about = "Normalize real-estate price lists and unit registries",
    long_about = "Reads irregular spreadsheets (stage and block title rows, merged \
                  carrier cells, mixed number locales) and writes normalized \
                  workbooks or ERP import files."
)]
pub struct Cli {
    /// Diagnostic output format.
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress diagnostics and the summary line.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log pipeline progress to stderr.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Maximum input size in bytes.
    #[arg(
        long,
        global = true,
        env = "IMOBI_MAX_FILE_SIZE",
        default_value = "16777216"
    )]
    pub max_file_size: u64,

    /// Disable ANSI colors in stderr output.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}
