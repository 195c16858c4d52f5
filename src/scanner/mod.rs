mod cancel;
mod formatter;
mod measure;
mod options;
mod search;
mod stats;
mod task;

pub use cancel::CancelToken;
pub use formatter::{format_json, format_result, format_size, format_total, sort_by_files};
pub use measure::measure_dir;
pub use options::{
    ScanOptions, SearchOptions, DEFAULT_EXCLUDE_DIRS, DEFAULT_TARGETS, MAX_AUTO_WORKERS,
};
pub use search::Searcher;
pub use stats::{aggregate, DirStats, ScanResult};
pub use task::{scan, ScanState, ScanTask, Scanner};
