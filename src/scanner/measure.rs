use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Result, SweepError};

use super::cancel::CancelToken;
use super::stats::DirStats;

/// Measure everything beneath `root`, `root` itself included.
///
/// Symlinks are counted as entries but never followed. The first unreadable
/// entry fails the whole measurement: a partial count is never returned.
/// `cancel` is polled before every entry.
pub fn measure_dir(root: &Path, cancel: &CancelToken) -> Result<DirStats> {
    let mut stats = DirStats::default();

    for entry in WalkDir::new(root).follow_links(false) {
        cancel.check()?;

        let entry = entry.map_err(|e| SweepError::walk(root, e))?;
        let metadata = entry.metadata().map_err(|e| SweepError::walk(root, e))?;

        stats.files += 1;
        if !entry.file_type().is_dir() {
            stats.bytes += metadata.len();
        }
    }

    Ok(stats)
}
