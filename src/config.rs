use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scanner::{ScanOptions, DEFAULT_EXCLUDE_DIRS, DEFAULT_TARGETS};

/// Largest accepted `scanner.workers` value.
pub const MAX_WORKERS: usize = 256;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory names to look for
    pub targets: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
    /// Measurement workers (0 = auto)
    pub workers: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Buffer results and sort by file count
    pub sort: bool,
    /// Print a JSON report instead of text lines
    pub json: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            workers: 0,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/deepsweep/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("deepsweep").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.scanner.targets {
            validate_name("targets", name)?;
        }
        for name in &self.scanner.exclude_dirs {
            validate_name("exclude_dirs", name)?;
        }
        if self.scanner.workers > MAX_WORKERS {
            return Err(ConfigError::Invalid(format!(
                "scanner.workers must be at most {}, got {}",
                MAX_WORKERS, self.scanner.workers
            )));
        }
        Ok(())
    }

    /// Scan options described by this configuration
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new()
            .with_targets(self.scanner.targets.iter().cloned())
            .with_exclude(self.scanner.exclude_dirs.iter().cloned())
            .with_workers(self.scanner.workers)
    }
}

/// Names are matched against a single path component, so they must be one.
fn validate_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ConfigError::Invalid(format!(
            "scanner.{} entries must be plain directory names, got {:?}",
            field, name
        )));
    }
    Ok(())
}
