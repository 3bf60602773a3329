//! Sinks that write encoded records as lines of text.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::record::TraceRecord;
use super::TraceSink;
use crate::domain::{InspectorError, LogFormat, Result, Severity};

/// Writes each record as one encoded entry to any `Write` target.
pub struct StreamSink<W> {
    writer: Mutex<W>,
    format: LogFormat,
}

impl<W: Write + Send> StreamSink<W> {
    pub const fn new(writer: W, format: LogFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    /// Consumes the sink and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns a sink error if a writer panicked while holding the lock.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| InspectorError::Sink(format!("Mutex poisoned: {e}")))
    }
}

impl StreamSink<io::Stderr> {
    #[must_use]
    pub fn stderr(format: LogFormat) -> Self {
        Self::new(io::stderr(), format)
    }
}

impl StreamSink<io::Stdout> {
    #[must_use]
    pub fn stdout(format: LogFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> TraceSink for StreamSink<W> {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        let line = record.encode(severity, self.format)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| InspectorError::Sink(format!("Mutex poisoned: {e}")))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl<W> std::fmt::Debug for StreamSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSink")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Appends encoded records to a file, one entry per write.
///
/// The file is created on the first record and kept open afterwards. It is never
/// truncated or rotated; existing content is appended to.
pub struct FileSink {
    path: PathBuf,
    format: LogFormat,
    file: Mutex<Option<File>>,
}

impl FileSink {
    #[must_use]
    pub const fn new(path: PathBuf, format: LogFormat) -> Self {
        Self {
            path,
            format,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for FileSink {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        let line = record.encode(severity, self.format)?;
        let mut file = self
            .file
            .lock()
            .map_err(|e| InspectorError::Sink(format!("Mutex poisoned: {e}")))?;

        if file.is_none() {
            tracing::debug!(path = ?self.path, "opening trace file");
            *file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let handle = file
            .as_mut()
            .ok_or_else(|| InspectorError::Sink("trace file is not open".to_string()))?;

        writeln!(handle, "{line}")?;
        handle.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageKind;
    use crate::encoding::encode_timestamp;
    use chrono::{TimeZone, Utc};

    fn record(message: &str) -> TraceRecord {
        TraceRecord {
            time: encode_timestamp(&Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            message: message.to_string(),
            server_id: "srv".to_string(),
            kind: Some(MessageKind::SendRequest),
            protocol_type: None,
            id: None,
            latency_ms: None,
            elapsed_ms: None,
            data: None,
        }
    }

    #[test]
    fn stream_writes_one_line_per_record() {
        let sink = StreamSink::new(Vec::new(), LogFormat::Text);
        sink.emit(Severity::Info, &record("one")).unwrap();
        sink.emit(Severity::Info, &record("two")).unwrap();

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("<srv> one\tmsgKind=send-request"));
    }

    #[test]
    fn file_sink_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let sink = FileSink::new(path.clone(), LogFormat::Json);

        sink.emit(Severity::Warn, &record("hello")).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["message"], "hello");
        assert_eq!(value["msgKind"], "send-request");
    }

    #[test]
    fn file_sink_only_ever_appends_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.log");
        std::fs::write(&path, "earlier session\n").unwrap();

        let sink = FileSink::new(path.clone(), LogFormat::Text);
        let big = "x".repeat(64 * 1024);
        for _ in 0..4 {
            sink.emit(Severity::Info, &record(&big)).unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier session\n"));
        assert_eq!(text.lines().count(), 5);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn file_sink_reports_unopenable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing").join("trace.log"), LogFormat::Text);
        let err = sink.emit(Severity::Info, &record("lost")).unwrap_err();
        assert!(matches!(err, InspectorError::Io(_)));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_propagate() {
        let sink = StreamSink::new(BrokenPipe, LogFormat::Text);
        let err = sink.emit(Severity::Info, &record("lost")).unwrap_err();
        assert!(matches!(err, InspectorError::Io(_)));
    }
}
