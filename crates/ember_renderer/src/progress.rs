//! Cross-worker progress tracking.
//!
//! Workers report each completed row to a shared [`ProgressTracker`], which
//! forwards the overall completion fraction to a [`ProgressSink`]. The
//! tracker is handed to workers by reference, never through global state.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Destination for progress reports.
///
/// `report` is fire-and-forget and is called concurrently from worker
/// threads, so implementations must not block for long.
pub trait ProgressSink: Sync {
    /// Report the fraction of the render completed, in [0, 1].
    fn report(&self, fraction: f32);
}

/// Shared row-completion counter for one render.
///
/// Counts completed rows across all workers and reports the running
/// fraction after each one. The counter is monotonic overall, though rows
/// from disjoint worker ranges may finish interleaved.
pub struct ProgressTracker<'a> {
    completed: AtomicUsize,
    total_rows: usize,
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressTracker<'a> {
    /// Create a tracker for a render of `total_rows` rows.
    pub fn new(total_rows: u32, sink: &'a dyn ProgressSink) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total_rows: total_rows as usize,
            sink,
        }
    }

    /// Record one finished row and report the new overall fraction.
    ///
    /// Must be called exactly once per completed row, `total_rows` times
    /// per render across all workers combined.
    pub fn row_complete(&self) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        self.sink.report(done as f32 / self.total_rows as f32);
    }

    /// Report completion unconditionally.
    ///
    /// Issued once by the orchestrator after all workers have joined, even
    /// if the per-row fractions already reached 1.0.
    pub fn finish(&self) {
        self.sink.report(1.0);
    }

    /// Rows completed so far.
    pub fn completed_rows(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Progress sink that draws a carriage-return bar on stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&self, fraction: f32) {
        const WIDTH: usize = 40;
        let filled = (fraction * WIDTH as f32) as usize;
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r[{}{}] {:>3.0}%",
            "=".repeat(filled.min(WIDTH)),
            " ".repeat(WIDTH - filled.min(WIDTH)),
            fraction * 100.0
        );
        if fraction >= 1.0 {
            let _ = writeln!(stderr);
        }
    }
}

/// Progress sink that discards all reports.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _fraction: f32) {}
}
