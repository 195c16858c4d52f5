use clap::builder::RangedU64ValueParser;
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::MAX_WORKERS;

/// deepsweep - find the build caches and dependency folders eating your disk
#[derive(Parser, Debug)]
#[command(name = "deepsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory names to look for (comma-separated)
    #[arg(short, long, value_delimiter = ',', value_name = "NAMES")]
    pub target: Option<Vec<String>>,

    /// Wait for the scan to finish and sort results by file count
    #[arg(short, long)]
    pub sort: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Parallel measurement workers (0 = auto)
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_WORKERS as u64)
    )]
    pub jobs: Option<usize>,

    /// Path to configuration file
    #[arg(short, long, env = "DEEPSWEEP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Target names given on the command line, without empty entries.
    pub fn targets(&self) -> Option<Vec<String>> {
        self.target.as_ref().map(|names| {
            names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
