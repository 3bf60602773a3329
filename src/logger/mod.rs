//! The trace logger capability.
//!
//! [`Logger`] is the interface the language-server client talks to: one call per
//! protocol lifecycle event. [`TraceLogger`] is the production implementation;
//! [`NoopLogger`] accepts everything and records nothing.
//!
//! Every operation is synchronous and self-contained. Loggers hold no mutable state,
//! so concurrent calls from different tasks need no locking here; interleaving of
//! their records is left to the sink.

mod clock;
mod trace_logger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use trace_logger::TraceLogger;

use serde::Serialize;

use crate::domain::{Payload, RequestMetadata, Result};

/// Language Server Protocol Inspector trace operations.
///
/// Callers are expected to log and continue on errors: a failed trace must not abort
/// the protocol operation it was observing.
pub trait Logger {
    /// Traces an outgoing request.
    ///
    /// # Errors
    ///
    /// Fails if the arguments cannot be serialized or the sink rejects the record.
    fn trace_request<B: Serialize>(
        &self,
        server_id: &str,
        payload: &Payload<B>,
        response_expected: bool,
        queue_length: usize,
    ) -> Result<()>;

    /// Traces a response to an earlier request.
    ///
    /// # Errors
    ///
    /// Fails if the result cannot be serialized or the sink rejects the record.
    fn trace_response<B: Serialize>(
        &self,
        server_id: &str,
        payload: &Payload<B>,
        meta: RequestMetadata,
    ) -> Result<()>;

    /// Traces completion of an asynchronous request. Completions carry no body.
    ///
    /// # Errors
    ///
    /// Fails only if the sink rejects the record.
    fn trace_request_completed(
        &self,
        server_id: &str,
        command: &str,
        request_sequence: i64,
        meta: RequestMetadata,
    ) -> Result<()>;

    /// Traces a server-pushed event.
    ///
    /// # Errors
    ///
    /// Fails if the event data cannot be serialized or the sink rejects the record.
    fn trace_event<B: Serialize>(&self, server_id: &str, event: &Payload<B>) -> Result<()>;
}

/// Logger that discards every trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn trace_request<B: Serialize>(&self, _: &str, _: &Payload<B>, _: bool, _: usize) -> Result<()> {
        Ok(())
    }

    fn trace_response<B: Serialize>(&self, _: &str, _: &Payload<B>, _: RequestMetadata) -> Result<()> {
        Ok(())
    }

    fn trace_request_completed(&self, _: &str, _: &str, _: i64, _: RequestMetadata) -> Result<()> {
        Ok(())
    }

    fn trace_event<B: Serialize>(&self, _: &str, _: &Payload<B>) -> Result<()> {
        Ok(())
    }
}
