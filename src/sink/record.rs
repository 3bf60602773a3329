//! The structured record handed to sinks.

use serde::Serialize;

use crate::domain::{LogFormat, MessageKind, Result, Severity};
use crate::encoding::Timestamp;

/// One traced event, ready for a sink.
///
/// Serialized field order is fixed: `time`, `message`, `serverId`, then the
/// kind-specific fields. Absent fields are omitted rather than written as `null`, and
/// `data` is only present at verbose level when the event carried a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub time: Timestamp,
    pub message: String,
    pub server_id: String,
    #[serde(rename = "msgKind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(rename = "msgType", skip_serializing_if = "Option::is_none")]
    pub protocol_type: Option<String>,
    #[serde(rename = "msgId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "msgLatency", skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// JSON line layout: the record's fields in order, then `level`.
#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    record: &'a TraceRecord,
    level: Severity,
}

impl TraceRecord {
    /// Encodes the record as output text, without a trailing newline.
    ///
    /// The text layout is tab separated: time, severity, `<server>` and summary, then
    /// any kind-specific fields as `key=value`. A body follows on its own lines.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails.
    pub fn encode(&self, severity: Severity, format: LogFormat) -> Result<String> {
        match format {
            LogFormat::Json => Ok(serde_json::to_string(&JsonLine {
                record: self,
                level: severity,
            })?),
            LogFormat::Text => Ok(self.encode_text(severity)),
        }
    }

    fn encode_text(&self, severity: Severity) -> String {
        let mut line = format!(
            "{}\t{}\t<{}> {}",
            self.time, severity, self.server_id, self.message
        );

        let mut fields = Vec::new();
        if let Some(kind) = self.kind {
            fields.push(format!("msgKind={kind}"));
        }
        if let Some(protocol_type) = &self.protocol_type {
            fields.push(format!("msgType={protocol_type}"));
        }
        if let Some(id) = &self.id {
            fields.push(format!("msgId={id}"));
        }
        if let Some(latency) = self.latency_ms {
            fields.push(format!("msgLatency={latency}ms"));
        }
        if let Some(elapsed) = self.elapsed_ms {
            fields.push(format!("elapsedMs={elapsed}"));
        }
        if !fields.is_empty() {
            line.push('\t');
            line.push_str(&fields.join(" "));
        }

        if let Some(data) = &self.data {
            line.push('\n');
            line.push_str(data);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_timestamp;
    use chrono::{TimeZone, Utc};

    fn record() -> TraceRecord {
        TraceRecord {
            time: encode_timestamp(&Utc.with_ymd_and_hms(2021, 3, 4, 10, 15, 30).unwrap()),
            message: "Event received: didOpen (0ms).".to_string(),
            server_id: "srv1".to_string(),
            kind: Some(MessageKind::ReceiveNotification),
            protocol_type: Some("event".to_string()),
            id: None,
            latency_ms: None,
            elapsed_ms: None,
            data: None,
        }
    }

    #[test]
    fn json_keeps_field_order_and_omits_absent_fields() {
        let line = record().encode(Severity::Info, LogFormat::Json).unwrap();
        assert_eq!(
            line,
            r#"{"time":"2021-03-04T10:15:30.000Z","message":"Event received: didOpen (0ms).","serverId":"srv1","msgKind":"recv-notification","msgType":"event","level":"info"}"#
        );
    }

    #[test]
    fn json_level_follows_every_record_field() {
        let mut record = record();
        record.id = Some("4".to_string());
        record.latency_ms = Some(12);
        record.elapsed_ms = Some(30);
        record.data = Some("Data:\n1".to_string());

        let line = record.encode(Severity::Warn, LogFormat::Json).unwrap();

        let keys: Vec<usize> = [
            "\"time\"",
            "\"message\"",
            "\"serverId\"",
            "\"msgKind\"",
            "\"msgType\"",
            "\"msgId\"",
            "\"msgLatency\"",
            "\"elapsedMs\"",
            "\"data\"",
            "\"level\"",
        ]
        .iter()
        .map(|key| line.find(key).unwrap())
        .collect();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "{line}");
        assert!(line.ends_with(r#""level":"warn"}"#));
    }

    #[test]
    fn text_joins_fields_with_spaces_after_a_tab() {
        let mut record = record();
        record.id = Some("4".to_string());
        record.latency_ms = Some(12);
        let line = record.encode(Severity::Info, LogFormat::Text).unwrap();
        assert!(line.ends_with("(0ms).\tmsgKind=recv-notification msgType=event msgId=4 msgLatency=12ms"));
    }

    #[test]
    fn text_puts_body_on_following_lines() {
        let mut record = record();
        record.data = Some("Data:\n{\n    \"x\": 1\n}".to_string());
        let line = record.encode(Severity::Debug, LogFormat::Text).unwrap();
        assert_eq!(
            line,
            "2021-03-04T10:15:30.000Z\tDEBUG\t<srv1> Event received: didOpen (0ms).\tmsgKind=recv-notification msgType=event\nData:\n{\n    \"x\": 1\n}"
        );
    }
}
