//! Single-pass discovery of target directories.

use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::SweepError;

use super::cancel::CancelToken;
use super::options::SearchOptions;

/// What the search does with a directory it has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// Keep walking into its children.
    Descend,
    /// Excluded: neither reported nor entered.
    Skip,
    /// A target: reported as a whole unit, contents never examined.
    Claim,
}

/// Walks a tree looking for target directories.
///
/// Only the outermost target along any path is ever reported: once a
/// directory is claimed, nothing inside it is looked at, so a
/// `node_modules` nested inside another `node_modules` never surfaces.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    options: SearchOptions,
}

impl Searcher {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    fn classify(&self, name: &OsStr) -> Visit {
        // Non UTF-8 names cannot equal any configured name.
        let Some(name) = name.to_str() else {
            return Visit::Descend;
        };

        if self.options.is_excluded(name) {
            Visit::Skip
        } else if self.options.is_target(name) {
            Visit::Claim
        } else {
            Visit::Descend
        }
    }

    /// Walk `root`, calling `on_match` for every target directory found.
    ///
    /// An error returned by `on_match` stops the walk immediately and is
    /// returned unchanged. Failing to read `root` itself is fatal; any other
    /// unreadable entry is skipped and the walk carries on.
    pub fn walk<F, E>(&self, root: &Path, on_match: F) -> Result<(), E>
    where
        F: FnMut(&Path) -> Result<(), E>,
        E: From<SweepError>,
    {
        self.walk_until(root, &CancelToken::new(), on_match)
    }

    /// Like [`Searcher::walk`], but checks `cancel` before every directory and
    /// fails with [`SweepError::Cancelled`] once it trips.
    pub fn walk_until<F, E>(&self, root: &Path, cancel: &CancelToken, mut on_match: F) -> Result<(), E>
    where
        F: FnMut(&Path) -> Result<(), E>,
        E: From<SweepError>,
    {
        let mut entries = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(SweepError::walk(root, err).into());
                }
                Err(err) => {
                    tracing::trace!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            cancel.check()?;

            match self.classify(entry.file_name()) {
                Visit::Descend => {}
                Visit::Skip => entries.skip_current_dir(),
                Visit::Claim => {
                    on_match(entry.path())?;
                    entries.skip_current_dir();
                }
            }
        }

        Ok(())
    }
}
