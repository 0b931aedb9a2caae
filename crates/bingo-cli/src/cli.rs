use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Generate printable bingo cards, read them back from PDFs and check them.
#[derive(Debug, Parser)]
#[command(name = "bingo", about, version)]
pub struct Cli {
    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate unique cards and write them as a printable PDF
    Generate {
        /// Number of cards to generate
        #[arg(short = 'n', long, default_value_t = 4)]
        count: usize,

        /// Where to write the PDF
        #[arg(short, long, value_name = "PDF")]
        output: PathBuf,

        /// Title printed on every card
        #[arg(long, default_value = "BINGO")]
        title: String,

        /// Number of the first serial (CARD00001 by default)
        #[arg(long, default_value_t = 1)]
        #[arg(value_parser = clap::value_parser!(u32).range(0..=99_999))]
        start: u32,

        /// Seed for reproducible cards
        #[arg(long)]
        seed: Option<u64>,

        /// Previously issued cards (PDF or JSON) that must not be repeated
        #[arg(long, value_name = "FILE")]
        existing: Vec<PathBuf>,

        /// Also write the generated cards as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Read the cards printed in a PDF
    Extract {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Check a set of cards for duplicates and repeated numbers
    Validate {
        /// Card files (PDF or JSON), checked together
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Exit with status 2 when any problem is found
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Rank cards against the numbers called so far
    Winner {
        /// Card file (PDF or JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Called numbers, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        called: Vec<u32>,

        /// Only list cards with a full line
        #[arg(long)]
        winners_only: bool,

        /// Print the top winning card, called cells struck through, to this PDF
        #[arg(long, value_name = "OUT")]
        pdf: Option<PathBuf>,

        /// Title printed on the winner card
        #[arg(long, default_value = "BINGO")]
        title: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Extract words with bounding box coordinates
    Words {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Horizontal gap in points that still joins characters into a word
        #[arg(long, default_value_t = 3.0)]
        x_tolerance: f64,

        /// Vertical gap in points that still joins characters into a word
        #[arg(long, default_value_t = 3.0)]
        y_tolerance: f64,
    },

    /// Extract page text, one line per text line
    Text {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

/// Flags that change how cards are read from a PDF.
#[derive(Debug, Clone, clap::Args)]
pub struct ReadArgs {
    /// Read every US Letter page with the printed card layout, even
    /// without a BINGO or CARD marker
    #[arg(long)]
    pub assume_layout: bool,

    /// Maximum nesting of form XObjects followed while reading text
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,
}

/// Output format for listings.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output format for reports.
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
