//! Latency rendering.
//!
//! Latencies and elapsed times are whole milliseconds everywhere. A `Duration` cannot
//! tell "not measured" from "measured as zero", so payloads carry `Option<Duration>`
//! and the configured [`LatencyDisplay`] decides how the absent case reads.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// How an absent latency is rendered in summary lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatencyDisplay {
    /// `0ms`, indistinguishable from a measured zero.
    #[default]
    ZeroWhenAbsent,
    /// `-`.
    DashWhenAbsent,
}

impl LatencyDisplay {
    #[must_use]
    pub fn render(self, latency: Option<Duration>) -> String {
        match (latency, self) {
            (Some(d), _) => format!("{}ms", duration_ms(d)),
            (None, Self::ZeroWhenAbsent) => "0ms".to_string(),
            (None, Self::DashWhenAbsent) => "-".to_string(),
        }
    }
}

impl FromStr for LatencyDisplay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "zero-when-absent" => Ok(Self::ZeroWhenAbsent),
            "dash" | "dash-when-absent" => Ok(Self::DashWhenAbsent),
            other => Err(format!("unknown latency display: {other}")),
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
