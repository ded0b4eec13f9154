//! Command line argument parsing for the sego CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// sego - dictionary-driven word segmentation for full-text analysis
#[derive(Parser, Debug, Clone)]
#[command(name = "sego")]
#[command(about = "Dictionary-driven word segmentation tokenizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SegoArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SegoArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Tokenize text into a position-numbered token stream
    Tokenize(TokenizeArgs),

    /// Show the raw segment trees produced by the dictionary
    Segment(SegmentArgs),
}

/// Dictionary selection shared by commands.
#[derive(Args, Debug, Clone)]
pub struct DictionaryArgs {
    /// Comma-separated dictionary file paths
    #[arg(short, long, env = "SEGO_DICT", value_name = "FILES")]
    pub dict: Option<String>,
}

/// Arguments for tokenizing
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    #[command(flatten)]
    pub dictionary: DictionaryArgs,

    /// Tokenizer definition file (JSON object with "type", "files", "nested").
    /// Takes precedence over --dict / SEGO_DICT.
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Emit top-level segments only (disable nested expansion)
    #[arg(long)]
    pub flat: bool,

    /// Tokenize every line of this file instead of TEXT
    #[arg(short, long, value_name = "INPUT_FILE", conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Text to tokenize
    #[arg(value_name = "TEXT", required_unless_present = "input")]
    pub text: Option<String>,
}

/// Arguments for inspecting segments
#[derive(Parser, Debug, Clone)]
pub struct SegmentArgs {
    #[command(flatten)]
    pub dictionary: DictionaryArgs,

    /// Text to segment
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
