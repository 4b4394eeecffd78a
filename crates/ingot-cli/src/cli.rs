//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ingot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging, extra report fields)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate, extract, and organize a conversation-export archive
    Ingest(IngestArgs),
    /// Validate an archive without extracting it into an export layout
    Check(CheckArgs),
}

/// Limit and configuration flags shared by every command.
#[derive(clap::Args, Debug, Default)]
pub struct LimitArgs {
    /// Load configuration from a JSON file (flags override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum upload size (supports K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size, value_name = "SIZE")]
    pub max_upload_size: Option<u64>,

    /// Maximum total extracted size (supports K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size, value_name = "SIZE")]
    pub max_extracted_size: Option<u64>,

    /// Maximum compression ratio (extracted / compressed)
    #[arg(long, value_parser = parse_ratio, value_name = "RATIO")]
    pub max_ratio: Option<f64>,

    /// Maximum number of archive entries
    #[arg(long, value_name = "COUNT")]
    pub max_entries: Option<usize>,

    /// Name of the marker file identifying the export
    #[arg(long, value_name = "NAME")]
    pub marker: Option<String>,

    /// Directory in which scratch areas are created
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct IngestArgs {
    /// Path to the uploaded archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Export root receiving the marker and ordinary files
    #[arg(value_name = "EXPORT_DIR")]
    pub export_dir: PathBuf,

    /// Media root (default: EXPORT_DIR/media)
    #[arg(long, value_name = "DIR")]
    pub media_dir: Option<PathBuf>,

    /// Skip the trial-extraction structure check
    #[arg(long)]
    pub skip_structure_check: bool,

    #[command(flatten)]
    pub limits: LimitArgs,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to the uploaded archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub limits: LimitArgs,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

/// Parse a positive, finite compression ratio
fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid ratio: {s}"))?;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(format!("ratio must be a positive number: {s}"));
    }
    Ok(ratio)
}
