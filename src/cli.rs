use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docforge")]
#[command(author, version, about = "Batch document conversion through headless LibreOffice")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert documents and print one JSON outcome per line
    Convert(ConvertArgs),

    /// List known formats
    Formats {
        /// Only formats of this category (writer, calc, impress, draw, math, graphic)
        #[arg(long)]
        category: Option<String>,

        /// Only list extensions that can be read
        #[arg(long, conflicts_with = "outputs")]
        inputs: bool,

        /// Only list extensions that can be written
        #[arg(long)]
        outputs: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether one extension can be converted to another
    CanConvert {
        /// Source extension (e.g. docx)
        from: String,

        /// Target extension (e.g. pdf)
        to: String,
    },

    /// Check that LibreOffice is available
    CheckTools,

    /// Install LibreOffice through the system package manager
    InstallTools,

    /// Remove LibreOffice through the system package manager
    UninstallTools,

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Files to convert
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Target format for every file
    #[arg(long, conflicts_with = "to_each", required_unless_present = "to_each")]
    pub to: Option<String>,

    /// Comma-separated target formats, one per file
    #[arg(long, value_delimiter = ',')]
    pub to_each: Vec<String>,

    /// Use the async bounded-concurrency model instead of the worker pool
    #[arg(long = "async")]
    pub use_async: bool,

    /// Per-file timeout in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Maximum simultaneous conversions in async mode
    #[arg(long, allow_negative_numbers = true)]
    pub max_concurrency: Option<i64>,

    /// Worker-pool size in parallel mode
    #[arg(long)]
    pub workers: Option<usize>,

    /// Do not install LibreOffice when it is missing
    #[arg(long)]
    pub no_install: bool,
}
