use humansize::DECIMAL;
use serde::Serialize;

use super::stats::{aggregate, DirStats, ScanResult};

/// Human-readable byte count in SI units
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, DECIMAL)
}

/// One output line: file count, size, path; tab separated.
pub fn format_result(result: &ScanResult) -> String {
    format!(
        "{:>7}\t{:>7}\t{}",
        result.stats.files,
        format_size(result.stats.bytes),
        result.path.display()
    )
}

/// Summary line printed after all results
pub fn format_total(total: DirStats) -> String {
    format!(
        "Total cleanable discovered: {} files, {}",
        total.files,
        format_size(total.bytes)
    )
}

/// Order results by file count, largest first. Ties fall back to path so the
/// output is stable.
pub fn sort_by_files(results: &mut [ScanResult]) {
    results.sort_by(|a, b| {
        b.stats
            .files
            .cmp(&a.stats.files)
            .then_with(|| a.path.cmp(&b.path))
    });
}

#[derive(Serialize)]
struct Report<'a> {
    results: &'a [ScanResult],
    total: DirStats,
}

/// Results plus their total as a JSON document
pub fn format_json(results: &[ScanResult], pretty: bool) -> serde_json::Result<String> {
    let report = Report {
        results,
        total: aggregate(results),
    };

    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
}
