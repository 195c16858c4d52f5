//! deepsweep - find disk-hogging directories and measure them
//!
//! This crate provides:
//! - A single-pass search for target directories (`node_modules`, `target`, ...)
//! - Concurrent, cancellable measurement of every match on a bounded pool
//! - A streaming result interface with a deferred fatal-error handle

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod scanner;
pub mod signals;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SweepError};
pub use scanner::{scan, CancelToken, DirStats, ScanResult, ScanTask, Scanner};
