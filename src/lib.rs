//! lsp-inspector: structured tracing for Language Server Protocol clients.
//!
//! Turns protocol lifecycle events (outgoing requests, incoming responses,
//! asynchronous completions, server-pushed events) into structured log records in the
//! LSP Inspector format, gated by a three-tier trace level:
//! - `off`: nothing is emitted and the sink is never touched
//! - `messages`: one summary line per event
//! - `verbose`: summary line plus the four-space indented JSON body

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Language-server client                             │  ← One call per event
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Logger (logger/)                                   │  ← Level gate
//! │  - TraceLogger: summary + body assembly             │  ← Elapsed time
//! │  - NoopLogger                                       │
//! └─────────────────────────────────────────────────────┘
//!         │                                     │
//! ┌───────────────────────┐   ┌─────────────────────────┐
//! │ Encoding (encoding/)  │   │ Sinks (sink/)           │
//! │ - ISO-8601 ms stamps  │   │ - stderr / stdout       │
//! │ - Indented bodies     │   │ - Append-only file      │
//! │ - Latency rendering   │   │ - tracing events        │
//! └───────────────────────┘   └─────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/)                                   │
//! │  - MessageKind, TraceLevel, Payload, errors         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Trace vocabulary (kinds, levels, payloads, errors)
//! - [`encoding`]: Timestamp, body and latency encoders
//! - [`sink`]: Record type and output destinations
//! - [`logger`]: The four trace operations
//! - [`observability`]: `tracing` subscriber setup
//!
//! # Configuration
//!
//! ```toml
//! trace_level = "verbose"
//! format = "json"
//! severity = "info"
//! latency = "dash-when-absent"
//! outputs = [{ type = "stderr" }, { type = "file", path = "/tmp/lsp-trace.log" }]
//! ```
//!
//! # Example
//!
//! ```rust
//! use lsp_inspector::{build_logger, Config, Logger, MessageKind, Payload, RequestMetadata, TraceLevel};
//! use serde_json::json;
//!
//! let config = Config {
//!     trace_level: TraceLevel::Verbose,
//!     ..Default::default()
//! };
//! let logger = build_logger(&config)?;
//!
//! let meta = RequestMetadata::queued_now();
//! let request = Payload::new(MessageKind::SendRequest, "request", "textDocument/hover")
//!     .with_id("1")
//!     .with_body(json!({ "line": 3, "character": 14 }));
//!
//! if let Err(e) = logger.trace_request("rust-analyzer", &request, true, 0) {
//!     tracing::debug!(error = %e, "trace failed");
//! }
//! logger.trace_request_completed("rust-analyzer", "textDocument/hover", 1, meta)?;
//! # Ok::<(), lsp_inspector::InspectorError>(())
//! ```

pub mod domain;
pub mod encoding;
pub mod logger;
pub mod observability;
pub mod sink;

pub use domain::{
    InspectorError, LogFormat, MessageKind, Payload, RequestMetadata, ResponseStatus, Result,
    Severity, TraceLevel,
};
pub use encoding::LatencyDisplay;
pub use logger::{Logger, NoopLogger, TraceLogger};

use serde::{Deserialize, Serialize};
use sink::{FanoutSink, Output};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Logger configuration.
///
/// Built once per client session and passed to [`build_logger`]. There is no global
/// logger; reconfiguring means building a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trace verbosity. Default: `off`
    pub trace_level: TraceLevel,

    /// Line encoding for stream and file outputs. Default: `text`
    pub format: LogFormat,

    /// Severity attached to every record. Default: `info`
    pub severity: Severity,

    /// How absent latencies render. Default: `zero-when-absent`
    pub latency: LatencyDisplay,

    /// Where records go. Default: stderr only
    pub outputs: Vec<Output>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: TraceLevel::default(),
            format: LogFormat::default(),
            severity: Severity::default(),
            latency: LatencyDisplay::default(),
            outputs: vec![Output::Stderr],
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::Config`] if the text is not valid TOML or a value has
    /// the wrong shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| InspectorError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration error if
    /// it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading inspector configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses configuration from flat string settings.
    ///
    /// # Parsing Rules
    ///
    /// - `trace_level`: `off` | `messages` | `verbose`
    /// - `format`: `text` | `json`
    /// - `severity`: `trace` | `debug` | `info` | `warn` | `error`
    /// - `latency`: `zero` | `dash`
    /// - `outputs`: comma-separated `stderr` | `stdout` | `tracing` | `file:<path>`
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use lsp_inspector::{Config, TraceLevel};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "verbose".to_string());
    /// map.insert("outputs".to_string(), "stderr,file:/tmp/lsp.log".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.trace_level, TraceLevel::Verbose);
    /// assert_eq!(config.outputs.len(), 2);
    /// ```
    #[must_use]
    pub fn from_map(settings: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let outputs = settings
            .get("outputs")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .filter_map(|o| parse_or_log::<Output>("outputs", o))
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.outputs);

        Self {
            trace_level: setting(settings, "trace_level").unwrap_or(defaults.trace_level),
            format: setting(settings, "format").unwrap_or(defaults.format),
            severity: setting(settings, "severity").unwrap_or(defaults.severity),
            latency: setting(settings, "latency").unwrap_or(defaults.latency),
            outputs,
        }
    }
}

fn setting<T: FromStr>(settings: &BTreeMap<String, String>, key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    settings.get(key).and_then(|v| parse_or_log(key, v))
}

fn parse_or_log<T: FromStr>(key: &str, value: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| tracing::debug!(key, value, error = %e, "invalid setting, using default"))
        .ok()
}

/// Builds a trace logger writing to every configured output.
///
/// # Errors
///
/// Returns an I/O error if a file output's directory cannot be created.
pub fn build_logger(config: &Config) -> Result<TraceLogger<FanoutSink>> {
    tracing::debug!(
        trace_level = %config.trace_level,
        format = %config.format,
        outputs = config.outputs.len(),
        "building trace logger"
    );

    let sinks = config
        .outputs
        .iter()
        .map(|output| output.open(config.format))
        .collect::<Result<Vec<_>>>()?;

    Ok(TraceLogger::new(config.trace_level, FanoutSink::new(sinks))
        .with_severity(config.severity)
        .with_latency_display(config.latency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_quiet_stderr() {
        let config = Config::default();
        assert_eq!(config.trace_level, TraceLevel::Off);
        assert_eq!(config.outputs, vec![Output::Stderr]);
    }

    #[test]
    fn parses_toml() {
        let config = Config::from_toml_str(
            r#"
            trace_level = "verbose"
            format = "json"
            latency = "dash-when-absent"
            outputs = [{ type = "tracing" }, { type = "file", path = "/tmp/lsp.log" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.trace_level, TraceLevel::Verbose);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.severity, Severity::Info);
        assert_eq!(config.latency, LatencyDisplay::DashWhenAbsent);
        assert_eq!(
            config.outputs,
            vec![
                Output::Tracing,
                Output::File {
                    path: PathBuf::from("/tmp/lsp.log")
                }
            ]
        );
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::from_toml_str("trace_level = \"loud\"").unwrap_err();
        assert!(matches!(err, InspectorError::Config(_)));
    }

    #[test]
    fn flat_settings_fall_back_on_bad_values_and_ignore_unknown_keys() {
        let mut map = BTreeMap::new();
        map.insert("trace_level".to_string(), "messages".to_string());
        map.insert("format".to_string(), "yaml".to_string());
        map.insert("outputs".to_string(), "syslog, ".to_string());
        map.insert("rotation_max_bytes".to_string(), "4096".to_string());

        let config = Config::from_map(&map);

        assert_eq!(config.trace_level, TraceLevel::Messages);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.outputs, vec![Output::Stderr]);
        assert_eq!(
            config,
            Config {
                trace_level: TraceLevel::Messages,
                ..Config::default()
            }
        );
    }

    #[test]
    fn builds_one_sink_per_output() {
        let config = Config {
            outputs: vec![Output::Stderr, Output::Tracing],
            ..Default::default()
        };
        let logger = build_logger(&config).unwrap();
        assert_eq!(logger.sink().len(), 2);
        assert_eq!(logger.level(), TraceLevel::Off);
    }
}
