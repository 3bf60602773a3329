//! Trace verbosity and record severity.
//!
//! [`TraceLevel`] is the three-tier gate deciding whether a trace is emitted at all and
//! whether its body is serialized. [`Severity`] is the level the emitted record carries
//! when it reaches the sink.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trace verbosity, ordered `Off < Messages < Verbose`.
///
/// The level is fixed when a logger is constructed. Changing it means building a new
/// logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    /// Suppress every trace. The sink is never touched.
    #[default]
    Off,
    /// Emit summary lines without bodies.
    Messages,
    /// Emit summary lines and, when available, serialized bodies.
    Verbose,
}

impl TraceLevel {
    /// True iff the level is not [`TraceLevel::Off`].
    #[must_use]
    pub const fn should_trace(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// True iff the level is [`TraceLevel::Verbose`].
    #[must_use]
    pub const fn should_include_body(self) -> bool {
        matches!(self, Self::Verbose)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Messages => "messages",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "messages" => Ok(Self::Messages),
            "verbose" => Ok(Self::Verbose),
            other => Err(format!("unknown trace level: {other}")),
        }
    }
}

/// Severity attached to every emitted trace record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Finest-grained diagnostics.
    Trace,
    /// Development detail.
    Debug,
    /// Normal operation; the level trace records use unless configured otherwise.
    #[default]
    Info,
    /// Something unexpected that did not stop the client.
    Warn,
    /// A failure worth attention.
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl From<Severity> for tracing::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Trace => Self::TRACE,
            Severity::Debug => Self::DEBUG,
            Severity::Info => Self::INFO,
            Severity::Warn => Self::WARN,
            Severity::Error => Self::ERROR,
        }
    }
}
