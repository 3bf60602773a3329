//! Caller-side description of one traced protocol event.
//!
//! A [`Payload`] is what the language-server client hands to the logger. The logger
//! stamps the time and turns it into a [`crate::sink::TraceRecord`]; callers never
//! supply the record time themselves.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::kind::MessageKind;

/// One protocol event as seen by the client.
///
/// The body type defaults to [`serde_json::Value`], but any `Serialize` type works.
/// Bodies are only serialized when the logger runs at verbose level.
///
/// # Examples
///
/// ```
/// use lsp_inspector::{MessageKind, Payload};
/// use serde_json::json;
///
/// let payload = Payload::new(MessageKind::SendRequest, "request", "textDocument/hover")
///     .with_id("7")
///     .with_body(json!({ "line": 3 }));
/// assert_eq!(payload.id.as_deref(), Some("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload<B = serde_json::Value> {
    /// Human-readable name of the message, used as the event name for events.
    pub message: String,

    pub kind: MessageKind,

    /// Wire-level type name (`request`, `response`, `event`, ...).
    pub protocol_type: String,

    /// Correlation identifier, `None` when not applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Measured latency, `None` when not measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,

    /// Arguments, result body or event data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<B>,

    /// Outcome of a response. `None` is read as success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

impl<B> Payload<B> {
    /// Creates a payload with no id, latency, body or status.
    pub fn new(kind: MessageKind, protocol_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            protocol_type: protocol_type.into(),
            id: None,
            latency: None,
            body: None,
            status: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ResponseStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Response outcome, defaulting to success.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.as_ref().map_or(true, |s| s.success)
    }
}

/// Outcome of a response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseStatus {
    pub success: bool,

    /// Failure description. Only rendered when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseStatus {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Correlation state for a request awaiting its response.
///
/// Created by the caller when the request is enqueued and consumed once when the
/// matching response or completion is traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMetadata {
    pub queuing_start_time: DateTime<Utc>,
}

impl RequestMetadata {
    #[must_use]
    pub const fn new(queuing_start_time: DateTime<Utc>) -> Self {
        Self { queuing_start_time }
    }

    /// Metadata for a request enqueued right now.
    #[must_use]
    pub fn queued_now() -> Self {
        Self::new(Utc::now())
    }

    /// Whole milliseconds between enqueueing and `now`, clamped at zero.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = now.signed_duration_since(self.queuing_start_time);
        u64::try_from(elapsed.num_milliseconds()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn elapsed_is_whole_milliseconds() {
        let start = Utc::now();
        let meta = RequestMetadata::new(start);
        assert_eq!(meta.elapsed_ms(start + TimeDelta::milliseconds(150)), 150);
        assert_eq!(meta.elapsed_ms(start + TimeDelta::microseconds(1_999)), 1);
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let start = Utc::now();
        let meta = RequestMetadata::new(start);
        assert_eq!(meta.elapsed_ms(start - TimeDelta::seconds(5)), 0);
    }

    #[test]
    fn missing_status_reads_as_success() {
        let payload: Payload = Payload::new(MessageKind::ReceiveResponse, "response", "hover");
        assert!(payload.success());
        let payload = payload.with_status(ResponseStatus::failed("boom"));
        assert!(!payload.success());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let payload: Payload = Payload::new(MessageKind::SendNotification, "notification", "initialized");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "initialized",
                "kind": "send-notification",
                "protocolType": "notification",
            })
        );
    }
}
