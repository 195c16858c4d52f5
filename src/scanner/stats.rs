use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;
use std::path::PathBuf;

/// Disk usage of a directory subtree.
///
/// Every entry visited counts toward `files`, directories included. Only
/// non-directory entries contribute to `bytes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DirStats {
    /// Number of entries, the subtree root included
    pub files: u64,

    /// Apparent size in bytes of all non-directory entries
    pub bytes: u64,
}

impl DirStats {
    pub fn new(files: u64, bytes: u64) -> Self {
        Self { files, bytes }
    }
}

impl Add for DirStats {
    type Output = DirStats;

    fn add(self, other: DirStats) -> DirStats {
        DirStats {
            files: self.files + other.files,
            bytes: self.bytes + other.bytes,
        }
    }
}

impl Sum for DirStats {
    fn sum<I: Iterator<Item = DirStats>>(iter: I) -> Self {
        iter.fold(DirStats::default(), Add::add)
    }
}

/// The measured size of one matched directory.
///
/// Results arrive out of order and asynchronously, so each one carries the
/// path it was measured from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScanResult {
    pub path: PathBuf,
    pub stats: DirStats,
}

impl ScanResult {
    pub fn new(path: PathBuf, stats: DirStats) -> Self {
        Self { path, stats }
    }
}

/// Total the stats of several results.
pub fn aggregate<'a, I>(results: I) -> DirStats
where
    I: IntoIterator<Item = &'a ScanResult>,
{
    results.into_iter().map(|r| r.stats).sum()
}
