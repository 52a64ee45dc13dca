use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted by the [`super::ExecutionEngine`] during a parallel join.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted,
    IndexBuilt { keys: usize },
    ChunkStarted { start_row: usize, row_count: usize },
    ChunkFinished { output_rows: usize, matched: usize },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Debug, Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                eprintln!("[join][done] elapsed={elapsed:?} {metrics}");
            }
            other => eprintln!("[join] {other:?}"),
        }
    }
}

/// Real-time counters for a join run.
///
/// The engine updates these while chunks are in flight; callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    rows_processed: AtomicU64,
    rows_matched: AtomicU64,
    chunks_started: AtomicU64,
    chunks_finished: AtomicU64,

    active_chunks: AtomicUsize,
    max_active_chunks: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
        for counter in [
            &self.elapsed_ns,
            &self.rows_processed,
            &self.rows_matched,
            &self.chunks_started,
            &self.chunks_finished,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
        self.active_chunks.store(0, Ordering::SeqCst);
        self.max_active_chunks.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        // Zero means "still running", so a finished run records at least 1ns.
        self.elapsed_ns.store(saturating_nanos(elapsed).max(1), Ordering::SeqCst);
    }

    pub fn on_row_processed(&self, matched: bool) {
        self.rows_processed.fetch_add(1, Ordering::SeqCst);
        if matched {
            self.rows_matched.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn on_chunk_start(&self) {
        self.chunks_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_chunks.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_chunks.fetch_max(now, Ordering::SeqCst);
    }

    pub fn on_chunk_end(&self) {
        self.chunks_finished.fetch_add(1, Ordering::SeqCst);
        self.active_chunks.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let rows_processed = self.rows_processed.load(Ordering::SeqCst);
        let rows_matched = self.rows_matched.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            rows_processed,
            rows_matched,
            rows_unmatched: rows_processed.saturating_sub(rows_matched),
            chunks_started: self.chunks_started.load(Ordering::SeqCst),
            chunks_finished: self.chunks_finished.load(Ordering::SeqCst),
            max_active_chunks: self.max_active_chunks.load(Ordering::SeqCst),
        }
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub rows_processed: u64,
    pub rows_matched: u64,
    pub rows_unmatched: u64,
    pub chunks_started: u64,
    pub chunks_finished: u64,
    pub max_active_chunks: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, rows_processed={}, matched={}, unmatched={}, chunks={}/{}, max_active_chunks={}, elapsed={:?}",
            self.run_id,
            self.rows_processed,
            self.rows_matched,
            self.rows_unmatched,
            self.chunks_finished,
            self.chunks_started,
            self.max_active_chunks,
            self.elapsed
        )
    }
}
