use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fconvert")]
#[command(author, about = "Convert batches of files to a target format")]
pub struct Cli {
    /// Target format, e.g. png, mp4, jxl
    #[arg(value_name = "FORMAT")]
    pub format: Option<String>,

    /// Files to convert
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Delete source files after successful conversion
    #[arg(short, long)]
    pub cleanup: bool,

    /// Destination directory for converted files (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Overwrite existing destination files instead of skipping them
    #[arg(short, long)]
    pub force: bool,

    /// Render a live completion counter
    #[arg(short, long)]
    pub progress: bool,

    /// Maximum concurrent conversions (default: all files at once; 1 runs
    /// them sequentially)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Print version information and continue
    #[arg(short = 'V', long)]
    pub version: bool,
}
