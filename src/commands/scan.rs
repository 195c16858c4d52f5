//! Scan command implementation

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::scanner::{
    aggregate, format_json, format_result, format_total, sort_by_files, CancelToken, ScanOptions,
    Scanner,
};

/// How results are presented
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Buffer until the scan completes, then sort by file count
    pub sort: bool,
    /// Print a JSON report instead of text lines
    pub json: bool,
    /// Hide the spinner
    pub quiet: bool,
}

impl OutputOptions {
    /// Whether results are held back until the scan completes
    fn buffered(&self) -> bool {
        self.sort || self.json
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run the scan command.
///
/// A fatal scan error (unreadable root, cancellation) is returned after the
/// result stream has been drained; nothing is totalled in that case.
pub fn run(root: &Path, options: ScanOptions, output: OutputOptions, cancel: CancelToken) -> Result<()> {
    tracing::info!(
        path = %root.display(),
        workers = options.worker_count(),
        "Scanning directory"
    );

    let task = Scanner::new(options).scan_with(root, cancel)?;

    let progress = (output.buffered() && !output.quiet).then(spinner);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut results = Vec::new();

    for result in &task {
        if !output.buffered() {
            writeln!(out, "{}", format_result(&result))?;
        }
        results.push(result);
        if let Some(pb) = &progress {
            pb.set_message(format!("{} found", results.len()));
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let unmeasured = task.unmeasured();
    task.wait()?;

    if unmeasured > 0 {
        tracing::warn!(
            count = unmeasured,
            "Some matched directories could not be measured and are not included"
        );
    }

    if output.sort {
        sort_by_files(&mut results);
    }

    if output.json {
        writeln!(out, "{}", format_json(&results, true)?)?;
        return Ok(());
    }

    if output.sort {
        for result in &results {
            writeln!(out, "{}", format_result(result))?;
        }
    }
    out.flush()?;

    eprintln!();
    eprintln!("{}", format_total(aggregate(&results)));

    Ok(())
}
