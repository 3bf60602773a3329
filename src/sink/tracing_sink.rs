//! Forwards trace records into the `tracing` ecosystem.
//!
//! Records become `tracing` events under the [`TRACE_TARGET`] target, with the
//! record's fields as structured event fields. Whatever subscriber is installed
//! decides where they end up; see [`crate::observability::init_tracing`].

use super::record::TraceRecord;
use super::TraceSink;
use crate::domain::{Result, Severity};

/// Target every forwarded record is emitted under.
pub const TRACE_TARGET: &str = "lsp_inspector::trace";

/// Sink emitting each record as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! emit_at {
    ($level:expr, $record:expr) => {{
        let record = $record;
        tracing::event!(
            target: TRACE_TARGET,
            $level,
            time = %record.time,
            server_id = %record.server_id,
            msg_kind = record.kind.map(tracing::field::display),
            msg_type = record.protocol_type.as_deref(),
            msg_id = record.id.as_deref(),
            msg_latency_ms = record.latency_ms,
            elapsed_ms = record.elapsed_ms,
            data = record.data.as_deref(),
            "{}",
            record.message
        )
    }};
}

impl TraceSink for TracingSink {
    fn emit(&self, severity: Severity, record: &TraceRecord) -> Result<()> {
        match severity {
            Severity::Trace => emit_at!(tracing::Level::TRACE, record),
            Severity::Debug => emit_at!(tracing::Level::DEBUG, record),
            Severity::Info => emit_at!(tracing::Level::INFO, record),
            Severity::Warn => emit_at!(tracing::Level::WARN, record),
            Severity::Error => emit_at!(tracing::Level::ERROR, record),
        }
        Ok(())
    }
}
