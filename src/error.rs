use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to start measurement workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Scan thread panicked")]
    Panicked,
}

impl SweepError {
    /// True if this error is the explicit cancellation error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SweepError::Cancelled)
    }

    /// The underlying I/O error kind, when there is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            SweepError::Io { source, .. } => Some(source.kind()),
            SweepError::Walk { source, .. } => source.io_error().map(|e| e.kind()),
            _ => None,
        }
    }

    /// Wrap a traversal error, naming the failing path when walkdir knows it.
    pub(crate) fn walk(fallback: &Path, source: walkdir::Error) -> Self {
        let path = source.path().unwrap_or(fallback).to_path_buf();
        SweepError::Walk { path, source }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweepError>;
