//! Production trace logger.
//!
//! Each operation checks the trace level first and returns immediately when tracing
//! is off, before taking a timestamp or touching the sink. Otherwise it assembles the
//! summary line, serializes the body at verbose level, and emits exactly one record.
//! A body that fails to serialize aborts the call before anything is emitted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clock::{Clock, SystemClock};
use super::Logger;
use crate::domain::{Payload, RequestMetadata, Result, Severity, TraceLevel};
use crate::encoding::{duration_ms, encode_timestamp, render_body, BodyLabel, LatencyDisplay};
use crate::sink::{TraceRecord, TraceSink};

/// Formats protocol events into [`TraceRecord`]s and hands them to a sink.
///
/// The level, severity and latency display are fixed at construction. To change
/// them, build a new logger.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use lsp_inspector::{Logger, MessageKind, Payload, TraceLevel, TraceLogger};
/// use lsp_inspector::sink::MemorySink;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = TraceLogger::new(TraceLevel::Messages, Arc::clone(&sink));
///
/// let event: Payload = Payload::new(MessageKind::ReceiveNotification, "event", "didOpen");
/// logger.trace_event("srv1", &event)?;
///
/// assert_eq!(sink.records()[0].1.message, "Event received: didOpen (0ms).");
/// # Ok::<(), lsp_inspector::InspectorError>(())
/// ```
pub struct TraceLogger<S> {
    sink: S,
    level: TraceLevel,
    severity: Severity,
    latency: LatencyDisplay,
    clock: Box<dyn Clock>,
}

impl<S: TraceSink> TraceLogger<S> {
    pub fn new(level: TraceLevel, sink: S) -> Self {
        Self {
            sink,
            level,
            severity: Severity::default(),
            latency: LatencyDisplay::default(),
            clock: Box::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_latency_display(mut self, latency: LatencyDisplay) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the time source used for stamps and elapsed time.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub const fn level(&self) -> TraceLevel {
        self.level
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Serializes `body` under `label` when the level includes bodies.
    ///
    /// At messages level the body is never looked at, so its serialization cost and
    /// failure modes do not apply.
    fn body_text<B: Serialize>(&self, label: BodyLabel, body: Option<&B>) -> Result<Option<String>> {
        match body {
            Some(body) if self.level.should_include_body() => render_body(label, body),
            _ => Ok(None),
        }
    }

    fn payload_record<B>(
        now: DateTime<Utc>,
        server_id: &str,
        payload: &Payload<B>,
        message: String,
    ) -> TraceRecord {
        TraceRecord {
            time: encode_timestamp(&now),
            message,
            server_id: server_id.to_string(),
            kind: Some(payload.kind),
            protocol_type: Some(payload.protocol_type.clone()),
            id: payload.id.clone(),
            latency_ms: payload.latency.map(duration_ms),
            elapsed_ms: None,
            data: None,
        }
    }

    fn emit(&self, record: &TraceRecord) -> Result<()> {
        self.sink.emit(self.severity, record)
    }
}

impl<S: TraceSink> Logger for TraceLogger<S> {
    fn trace_request<B: Serialize>(
        &self,
        server_id: &str,
        payload: &Payload<B>,
        response_expected: bool,
        queue_length: usize,
    ) -> Result<()> {
        if !self.level.should_trace() {
            return Ok(());
        }

        let data = self.body_text(BodyLabel::Arguments, payload.body.as_ref())?;
        let message = format!(
            "Sending request: {} ({}). Response expected: {}. Current queue length: {}",
            payload.kind,
            self.latency.render(payload.latency),
            if response_expected { "yes" } else { "no" },
            queue_length,
        );

        let mut record = Self::payload_record(self.clock.now(), server_id, payload, message);
        record.data = data;
        self.emit(&record)
    }

    fn trace_response<B: Serialize>(
        &self,
        server_id: &str,
        payload: &Payload<B>,
        meta: RequestMetadata,
    ) -> Result<()> {
        if !self.level.should_trace() {
            return Ok(());
        }

        let data = self.body_text(BodyLabel::Result, payload.body.as_ref())?;
        let now = self.clock.now();
        let elapsed = meta.elapsed_ms(now);

        let success = payload.success();
        let mut message = format!(
            "Response received: {} ({}). Request took {} ms. Success: {}",
            payload.kind,
            self.latency.render(payload.latency),
            elapsed,
            success,
        );
        if !success {
            let reason = payload
                .status
                .as_ref()
                .and_then(|s| s.message.as_deref())
                .unwrap_or_default();
            message.push_str(". Message: ");
            message.push_str(reason);
        }

        let mut record = Self::payload_record(now, server_id, payload, message);
        record.elapsed_ms = Some(elapsed);
        record.data = data;
        self.emit(&record)
    }

    fn trace_request_completed(
        &self,
        server_id: &str,
        command: &str,
        request_sequence: i64,
        meta: RequestMetadata,
    ) -> Result<()> {
        if !self.level.should_trace() {
            return Ok(());
        }

        let now = self.clock.now();
        let elapsed = meta.elapsed_ms(now);

        let record = TraceRecord {
            time: encode_timestamp(&now),
            message: format!(
                "Async response received: {command} ({request_sequence}). Request took {elapsed} ms."
            ),
            server_id: server_id.to_string(),
            kind: None,
            protocol_type: None,
            id: Some(request_sequence.to_string()),
            latency_ms: None,
            elapsed_ms: Some(elapsed),
            data: None,
        };
        self.emit(&record)
    }

    fn trace_event<B: Serialize>(&self, server_id: &str, event: &Payload<B>) -> Result<()> {
        if !self.level.should_trace() {
            return Ok(());
        }

        let data = self.body_text(BodyLabel::Data, event.body.as_ref())?;
        let message = format!(
            "Event received: {} ({}).",
            event.message,
            self.latency.render(event.latency),
        );

        let mut record = Self::payload_record(self.clock.now(), server_id, event, message);
        record.data = data;
        self.emit(&record)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for TraceLogger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("sink", &self.sink)
            .field("level", &self.level)
            .field("severity", &self.severity)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}
