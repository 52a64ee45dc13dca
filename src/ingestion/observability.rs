use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{LookupError, TableRole};

use super::unified::TableFormat;

/// How bad a failed load is. Ordered, so a threshold can decide what becomes an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The table could not be read.
    Error,
    /// Infrastructure failure (typically I/O).
    Critical,
}

/// What was being loaded.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: TableFormat,
    /// Which side of the lookup this table feeds, when the caller said so.
    pub role: Option<TableRole>,
}

/// Shape of a successfully loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Rows including the header.
    pub rows: usize,
    /// Zero-length body rows.
    pub blank_rows: usize,
    /// Length of the longest row.
    pub width: usize,
}

/// Observer interface for table loads.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &LookupError) {}

    /// Called when a failure meets the alert threshold. Defaults to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        self.on_failure(ctx, severity, error)
    }
}

/// One observer callback, rendered as a single log line.
enum LoadEvent<'a> {
    Loaded(IngestionStats),
    Failed(IngestionSeverity, &'a LookupError),
    Alert(IngestionSeverity, &'a LookupError),
}

struct LoadLine<'a>(&'a IngestionContext, LoadEvent<'a>);

impl fmt::Display for LoadLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let LoadLine(ctx, event) = self;
        match event {
            LoadEvent::Loaded(_) => f.write_str("ok ")?,
            LoadEvent::Failed(severity, _) => write!(f, "fail severity={severity:?} ")?,
            LoadEvent::Alert(severity, _) => write!(f, "ALERT severity={severity:?} ")?,
        }
        if let Some(role) = ctx.role {
            write!(f, "{role} ")?;
        }
        write!(f, "{} format={:?}", ctx.path.display(), ctx.format)?;
        match event {
            LoadEvent::Loaded(stats) => write!(
                f,
                " rows={} blank_rows={} width={}",
                stats.rows, stats.blank_rows, stats.width
            ),
            LoadEvent::Failed(_, error) | LoadEvent::Alert(_, error) => write!(f, " err={error}"),
        }
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[load] {}", LoadLine(ctx, LoadEvent::Loaded(stats)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        eprintln!("[load] {}", LoadLine(ctx, LoadEvent::Failed(severity, error)));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        eprintln!("[load] {}", LoadLine(ctx, LoadEvent::Alert(severity, error)));
    }
}

/// Appends timestamped load events to a local log file.
///
/// Failures to open or write the log are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, line: LoadLine<'_>) {
        let _guard = self.lock.lock().ok();
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{secs} {line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(LoadLine(ctx, LoadEvent::Loaded(stats)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        self.append(LoadLine(ctx, LoadEvent::Failed(severity, error)));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        self.append(LoadLine(ctx, LoadEvent::Alert(severity, error)));
    }
}

/// Fans callbacks out to several observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn IngestionObserver>) {
        self.observers.push(observer);
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &LookupError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}
