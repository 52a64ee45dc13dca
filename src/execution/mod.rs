//! Parallel execution of the lookup join.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Chunked execution of the matching phase on a dedicated `rayon` pool
//! - Order preservation: the result is identical to [`crate::processing::join`]
//! - Real-time metrics + observer hooks for monitoring
//!
//! The index is built once, sequentially, before any chunk runs.

mod observer;

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::LookupResult;
use crate::processing::join::{check_inputs, match_row};
use crate::processing::{
    result_header, LookupColumns, LookupIndex, LookupOptions, LookupOutcome, LookupStats,
};
use crate::settings::LookupSettings;
use crate::types::{Table, Value};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    StdErrExecutionObserver,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads. `None` (or `Some(0)`) uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Lookup rows per chunk; values below 1 are treated as 1.
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: 4_096,
        }
    }
}

/// Runs joins with the matching phase spread over a thread pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    pub fn new(opts: ExecutionOptions) -> LookupResult<Self> {
        let n_threads = opts
            .num_threads
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts: ExecutionOptions {
                chunk_size: opts.chunk_size.max(1),
                ..opts
            },
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Same contract as [`crate::processing::join`], with lookup rows matched in parallel chunks.
    pub fn join_parallel(
        &self,
        source: &Table,
        lookup: &Table,
        columns: &LookupColumns,
        options: &LookupOptions,
    ) -> LookupOutcome {
        self.pool
            .install(|| self.join_parallel_impl(source, lookup, columns, options))
    }

    /// Same contract as [`crate::processing::lookup_tables`], joined via [`Self::join_parallel`].
    pub fn lookup_tables(
        &self,
        source: &Table,
        lookup: &Table,
        settings: &LookupSettings,
    ) -> LookupResult<LookupOutcome> {
        check_inputs(source, lookup)?;
        let (columns, options) = settings.resolve()?;
        Ok(self.join_parallel(source, lookup, &columns, &options))
    }

    fn join_parallel_impl(
        &self,
        source: &Table,
        lookup: &Table,
        columns: &LookupColumns,
        options: &LookupOptions,
    ) -> LookupOutcome {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let index = LookupIndex::build(source, columns.key, &options.cleaning);
        self.emit(ExecutionEvent::IndexBuilt { keys: index.len() });

        let body = lookup.body();
        let per_chunk: Vec<(Vec<Vec<Value>>, LookupStats)> =
            chunk_ranges(body.len(), self.opts.chunk_size)
                .into_par_iter()
                .map(|range| {
                    self.metrics.on_chunk_start();
                    self.emit(ExecutionEvent::ChunkStarted {
                        start_row: range.start,
                        row_count: range.len(),
                    });

                    let mut rows = Vec::new();
                    let mut stats = LookupStats::default();
                    for row in &body[range] {
                        let Some(hit) = match_row(&index, row, columns, options) else {
                            continue;
                        };
                        stats.record(hit.matched);
                        self.metrics.on_row_processed(hit.matched);
                        rows.extend(hit.row);
                    }

                    self.emit(ExecutionEvent::ChunkFinished {
                        output_rows: rows.len(),
                        matched: stats.matched,
                    });
                    self.metrics.on_chunk_end();
                    (rows, stats)
                })
                .collect();

        let mut rows = vec![result_header(source, lookup, columns, &options.output)];
        let mut stats = LookupStats::default();
        for (chunk_rows, chunk_stats) in per_chunk {
            rows.extend(chunk_rows);
            stats.merge(chunk_stats);
        }

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        LookupOutcome {
            table: Table::new(rows),
            stats,
            filter: options.filter,
        }
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..row_count)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(row_count))
        .collect()
}
