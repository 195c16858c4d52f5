//! Concurrent search-and-measure coordination.
//!
//! One background thread runs the search. Each match is handed to a fixed
//! rayon pool that measures it and streams the result back over a rendezvous
//! channel. A counting semaphore sized to the pool couples the two: when every
//! worker is busy, the search blocks instead of queueing matches in memory.

use crossbeam_channel::{Iter, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{Result, SweepError};

use super::cancel::CancelToken;
use super::measure::measure_dir;
use super::options::ScanOptions;
use super::search::Searcher;
use super::stats::{DirStats, ScanResult};

/// Lifecycle of a scan. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ScanState {
    /// The search is still walking; workers are measuring.
    Running = 0,
    /// The search has returned; in-flight measurements are finishing.
    Draining = 1,
    /// Every worker has finished and the result stream is closed.
    Done = 2,
}

impl ScanState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ScanState::Running,
            1 => ScanState::Draining,
            _ => ScanState::Done,
        }
    }
}

/// Counters shared between the coordinator and the task handle.
#[derive(Debug, Default)]
struct Progress {
    state: AtomicU8,
    matched: AtomicU64,
    unmeasured: AtomicU64,
}

impl Progress {
    fn state(&self) -> ScanState {
        ScanState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn advance(&self, state: ScanState) {
        self.state.fetch_max(state as u8, Ordering::SeqCst);
    }
}

/// Marks the scan done when the coordinator unwinds, panics included.
struct DoneOnDrop<'a>(&'a Progress);

impl Drop for DoneOnDrop<'_> {
    fn drop(&mut self) {
        self.0.advance(ScanState::Draining);
        self.0.advance(ScanState::Done);
    }
}

/// Counting semaphore built on a bounded channel.
struct Permits {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Permits {
    fn new(capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self { tx, rx }
    }

    /// Blocks while all permits are taken.
    fn acquire(&self) -> Permit<'_> {
        // Both ends live as long as self, so this can only block, never fail.
        let _ = self.tx.send(());
        Permit(self)
    }
}

struct Permit<'a>(&'a Permits);

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.0.rx.try_recv();
    }
}

/// Finds target directories and measures them concurrently.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Start scanning `root` in the background.
    pub fn scan(&self, root: impl Into<PathBuf>) -> Result<ScanTask> {
        self.scan_with(root, CancelToken::new())
    }

    /// Start scanning `root` in the background, stopping early once `cancel`
    /// trips.
    ///
    /// Returns immediately. Results arrive on [`ScanTask::results`] in
    /// completion order; the fatal error, if any, comes from
    /// [`ScanTask::wait`]. Only an empty `root` is rejected up front.
    pub fn scan_with(&self, root: impl Into<PathBuf>, cancel: CancelToken) -> Result<ScanTask> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(SweepError::InvalidPath("empty root path".into()));
        }

        let (results_tx, results_rx) = crossbeam_channel::bounded(0);
        let progress = Arc::new(Progress::default());
        let searcher = Searcher::new(self.options.search.clone());
        let workers = self.options.worker_count();

        let thread = {
            let cancel = cancel.clone();
            let progress = Arc::clone(&progress);
            let walk_root = root.clone();
            thread::Builder::new()
                .name("deepsweep-search".into())
                .spawn(move || {
                    coordinate(&searcher, &walk_root, workers, &cancel, &progress, results_tx)
                })
                .map_err(|source| SweepError::Io { path: root, source })?
        };

        Ok(ScanTask {
            results: results_rx,
            progress,
            cancel,
            thread: Some(thread),
        })
    }
}

/// Scan `root` for `targets` with default exclusions and pool size.
pub fn scan<I, S>(root: impl Into<PathBuf>, targets: I) -> Result<ScanTask>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Scanner::new(ScanOptions::new().with_targets(targets)).scan(root)
}

/// Body of the background thread.
///
/// `results` is a parameter, so it is dropped after every local: the state
/// reads `Done` before the stream closes.
fn coordinate(
    searcher: &Searcher,
    root: &Path,
    workers: usize,
    cancel: &CancelToken,
    progress: &Progress,
    results: Sender<ScanResult>,
) -> Result<()> {
    let _done = DoneOnDrop(progress);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("deepsweep-measure-{i}"))
        .build()?;
    let permits = Permits::new(workers);

    tracing::debug!(root = %root.display(), workers, "Scan started");

    let outcome = pool.in_place_scope(|scope| {
        let walked = searcher.walk_until(root, cancel, |matched: &Path| -> Result<()> {
            cancel.check()?;
            let permit = permits.acquire();
            progress.matched.fetch_add(1, Ordering::Relaxed);

            let path = matched.to_path_buf();
            let results = results.clone();
            scope.spawn(move |_| {
                let _permit = permit;
                let measured = measure_dir(&path, cancel);
                deliver(path, measured, &results, progress);
            });
            Ok(())
        });

        progress.advance(ScanState::Draining);
        walked
    });

    // A cancel that lands while the pool drains leaves the results partial.
    let outcome = match outcome {
        Ok(()) if cancel.is_cancelled() => Err(SweepError::Cancelled),
        other => other,
    };

    match &outcome {
        Ok(()) => tracing::debug!(
            matched = progress.matched.load(Ordering::Relaxed),
            unmeasured = progress.unmeasured.load(Ordering::Relaxed),
            "Scan finished"
        ),
        Err(err) => tracing::debug!(error = %err, "Scan aborted"),
    }

    outcome
}

/// Publish one measurement, or account for why there is nothing to publish.
fn deliver(
    path: PathBuf,
    measured: Result<DirStats>,
    results: &Sender<ScanResult>,
    progress: &Progress,
) {
    match measured {
        Ok(stats) => {
            if results.send(ScanResult::new(path, stats)).is_err() {
                tracing::debug!("Result receiver dropped, discarding result");
            }
        }
        Err(err) if err.is_cancelled() => {}
        Err(err) => {
            progress.unmeasured.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "Dropping match that could not be measured"
            );
        }
    }
}

/// Handle to a running scan.
///
/// Drain [`ScanTask::results`] (or iterate `&task`), then call
/// [`ScanTask::wait`] for the outcome. Cancelling at any point before the
/// stream closes makes `wait` return [`SweepError::Cancelled`].
///
/// Dropping the handle early cancels the scan but does not join it: the
/// background thread winds down on its own once its workers see the flag or
/// fail to send to the dropped receiver.
pub struct ScanTask {
    results: Receiver<ScanResult>,
    progress: Arc<Progress>,
    cancel: CancelToken,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ScanTask {
    /// The result stream. Disconnects once the search and every dispatched
    /// measurement have finished.
    pub fn results(&self) -> &Receiver<ScanResult> {
        &self.results
    }

    /// Blocking iterator over results, ending when the stream closes.
    pub fn iter(&self) -> Iter<'_, ScanResult> {
        self.results.iter()
    }

    /// Request cancellation. In-flight work stops at its next check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn state(&self) -> ScanState {
        self.progress.state()
    }

    /// Matches handed to the measurement pool so far.
    pub fn matched(&self) -> u64 {
        self.progress.matched.load(Ordering::Relaxed)
    }

    /// Matches dropped because their measurement failed.
    pub fn unmeasured(&self) -> u64 {
        self.progress.unmeasured.load(Ordering::Relaxed)
    }

    /// Wait for the scan to finish and return its fatal error, if any.
    ///
    /// Results not yet read are discarded. Per-match measurement failures are
    /// not errors here; see [`ScanTask::unmeasured`].
    pub fn wait(mut self) -> Result<()> {
        // Unread results would keep workers parked on send.
        for _ in self.results.iter() {}

        match self.thread.take() {
            Some(handle) => handle.join().map_err(|_| SweepError::Panicked)?,
            None => Ok(()),
        }
    }

    /// Collect every result, then wait.
    pub fn collect(self) -> Result<Vec<ScanResult>> {
        let results: Vec<ScanResult> = self.results.iter().collect();
        self.wait()?;
        Ok(results)
    }
}

impl<'a> IntoIterator for &'a ScanTask {
    type Item = ScanResult;
    type IntoIter = Iter<'a, ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Drop for ScanTask {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.cancel.cancel();
        }
    }
}
