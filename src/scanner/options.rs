use std::collections::HashSet;

/// Directory names scanned for when the caller does not supply any.
pub const DEFAULT_TARGETS: &[&str] = &["node_modules", ".bundle", "target"];

/// Version-control metadata directories. Never descended into, never reported.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", ".hg", ".svn", ".jj"];

/// Upper bound on the automatically sized measurement pool.
pub const MAX_AUTO_WORKERS: usize = 8;

/// What the search looks for and what it refuses to enter.
///
/// Both sets hold exact basenames; there is no glob or regex matching.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Directory basenames to report
    pub targets: HashSet<String>,

    /// Directory basenames to skip entirely (checked before `targets`)
    pub exclude_dirs: HashSet<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TARGETS.iter().copied())
    }
}

impl SearchOptions {
    /// Search for `targets`, excluding the default version-control directories.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the exclusion set
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    pub fn is_target(&self, name: &str) -> bool {
        self.targets.contains(name)
    }
}

/// Configuration for a full scan: the search plus the measurement pool.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub search: SearchOptions,

    /// Number of measurement workers (0 = auto)
    pub workers: usize,
}

impl ScanOptions {
    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target names
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the exclusion names
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = self.search.with_exclude(names);
        self
    }

    /// Set the number of measurement workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Resolved pool size: the explicit setting, or `min(8, CPUs)`.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            num_cpus::get().clamp(1, MAX_AUTO_WORKERS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ScanOptions::default();
        assert_eq!(opts.workers, 0);
        assert!(opts.search.is_target("node_modules"));
        assert!(opts.search.is_target(".bundle"));
        assert!(opts.search.is_target("target"));
        assert!(opts.search.is_excluded(".git"));
        assert!(opts.search.is_excluded(".jj"));
    }

    #[test]
    fn test_scan_options_builder() {
        let opts = ScanOptions::new()
            .with_targets(["vendor"])
            .with_exclude([".cache"])
            .with_workers(3);

        assert!(opts.search.is_target("vendor"));
        assert!(!opts.search.is_target("node_modules"));
        assert!(opts.search.is_excluded(".cache"));
        assert!(!opts.search.is_excluded(".git"));
        assert_eq!(opts.worker_count(), 3);
    }

    #[test]
    fn test_auto_worker_count_is_bounded() {
        let count = ScanOptions::new().worker_count();
        assert!(count >= 1);
        assert!(count <= MAX_AUTO_WORKERS);
    }

    #[test]
    fn test_matching_is_exact() {
        let opts = SearchOptions::new(["node_modules"]);
        assert!(opts.is_target("node_modules"));
        assert!(!opts.is_target("node_modules2"));
        assert!(!opts.is_target("Node_Modules"));
        assert!(!opts.is_target("node_*"));
    }

    #[test]
    fn test_empty_target_set_matches_nothing() {
        let opts = SearchOptions::new(Vec::<String>::new());
        assert!(opts.targets.is_empty());
        assert!(!opts.is_target("node_modules"));
    }
}
