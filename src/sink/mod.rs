//! Logging sinks.
//!
//! A sink accepts one [`TraceRecord`] at a severity and appends it somewhere. The
//! formatter never writes anything itself; it builds the record and hands it over.
//! Thread-safety of concurrent writes is each sink's own business.
//!
//! # Implementations
//!
//! - [`StreamSink`]: stderr, stdout or any `Write`
//! - [`FileSink`]: append-only file
//! - [`TracingSink`]: `tracing` events
//! - [`FanoutSink`]: several sinks at once
//! - [`MemorySink`]: collects records in memory, for tests

mod record;
mod stream;
mod tracing_sink;

pub use record::TraceRecord;
pub use stream::{FileSink, StreamSink};
pub use tracing_sink::{TracingSink, TRACE_TARGET};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::domain::{InspectorError, LogFormat, Result, Severity};

/// Destination for structured trace records.
///
/// # Errors
///
/// Implementations return an error when the record could not be written. Errors are
/// propagated to the trace caller unchanged and never retried.
pub trait TraceSink: Send + Sync {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()>;
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        (**self).emit(severity, record)
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Arc<S> {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        (**self).emit(severity, record)
    }
}

/// Sends every record to each inner sink in order.
///
/// Stops at the first failing sink and returns its error.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn TraceSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn TraceSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: impl TraceSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TraceSink for FanoutSink {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        for sink in &self.sinks {
            sink.emit(severity, record)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// Keeps every emitted record in memory.
///
/// A sink built with [`MemorySink::failing`] rejects every record instead, which lets
/// tests drive the sink-error path.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Severity, TraceRecord)>>,
    failure: Option<String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// Snapshot of the records emitted so far.
    #[must_use]
    pub fn records(&self) -> Vec<(Severity, TraceRecord)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(InspectorError::Sink(reason.clone()));
        }
        self.records
            .lock()
            .map_err(|e| InspectorError::Sink(format!("Mutex poisoned: {e}")))?
            .push((severity, record.clone()));
        Ok(())
    }
}

/// A configured output destination.
///
/// In TOML: `{ type = "stderr" }`, `{ type = "file", path = "/tmp/lsp.log" }`.
/// As a flat string: `stderr`, `stdout`, `tracing` or `file:<path>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Output {
    /// Process standard error.
    Stderr,
    /// Process standard output.
    Stdout,
    /// `tracing` events under [`TRACE_TARGET`].
    Tracing,
    /// Append-only file, created with its parent directory if missing.
    File { path: PathBuf },
}

impl Output {
    /// Opens the sink for this destination.
    ///
    /// Files are opened lazily on the first record, so this only fails when the
    /// parent directory cannot be created.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file output's parent directory cannot be created.
    pub fn open(&self, format: LogFormat) -> Result<Box<dyn TraceSink>> {
        tracing::debug!(output = ?self, %format, "opening trace output");
        let sink: Box<dyn TraceSink> = match self {
            Self::Stderr => Box::new(StreamSink::stderr(format)),
            Self::Stdout => Box::new(StreamSink::stdout(format)),
            Self::Tracing => Box::new(TracingSink),
            Self::File { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Box::new(FileSink::new(path.clone(), format))
            }
        };
        Ok(sink)
    }
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("file:") {
            if path.is_empty() {
                return Err("file output needs a path".to_string());
            }
            return Ok(Self::File {
                path: PathBuf::from(path),
            });
        }
        match s.to_ascii_lowercase().as_str() {
            "stderr" => Ok(Self::Stderr),
            "stdout" => Ok(Self::Stdout),
            "tracing" => Ok(Self::Tracing),
            other => Err(format!("unknown output: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_timestamp;

    fn record() -> TraceRecord {
        TraceRecord {
            time: encode_timestamp(&chrono::Utc::now()),
            message: "m".to_string(),
            server_id: "s".to_string(),
            kind: None,
            protocol_type: None,
            id: None,
            latency_ms: None,
            elapsed_ms: None,
            data: None,
        }
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = Arc::new(MemorySink::new());
        let b = Arc::new(MemorySink::new());
        let mut fanout = FanoutSink::default();
        fanout.push(Arc::clone(&a));
        fanout.push(Arc::clone(&b));

        fanout.emit(Severity::Info, &record()).unwrap();

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn fanout_stops_at_first_failure() {
        let after = Arc::new(MemorySink::new());
        let mut fanout = FanoutSink::default();
        fanout.push(MemorySink::failing("disk full"));
        fanout.push(Arc::clone(&after));

        let err = fanout.emit(Severity::Info, &record()).unwrap_err();

        assert!(matches!(err, InspectorError::Sink(ref m) if m == "disk full"));
        assert!(after.is_empty());
    }

    #[test]
    fn parses_flat_outputs() {
        assert_eq!("stderr".parse(), Ok(Output::Stderr));
        assert_eq!(" Tracing ".parse(), Ok(Output::Tracing));
        assert_eq!(
            "file:/var/log/lsp.log".parse(),
            Ok(Output::File {
                path: PathBuf::from("/var/log/lsp.log")
            })
        );
        assert!("file:".parse::<Output>().is_err());
        assert!("syslog".parse::<Output>().is_err());
    }

    #[test]
    fn file_output_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trace.log");
        let output = Output::File { path: path.clone() };

        let sink = output.open(LogFormat::Text).unwrap();
        sink.emit(Severity::Info, &record()).unwrap();

        assert!(path.exists());
    }
}
