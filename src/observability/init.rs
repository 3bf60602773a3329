//! Tracing initialization and subscriber setup.
//!
//! This module installs the process-wide `tracing` subscriber that receives records
//! from [`crate::sink::TracingSink`] as well as the crate's own diagnostics.

use crate::encoding::Iso8601Millis;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes a stderr `tracing` subscriber stamped with millisecond UTC times.
///
/// Sets up a subscriber pipeline that:
/// 1. Filters events by `RUST_LOG`, falling back to `config.severity`
/// 2. Formats them as console lines with `YYYY-MM-DDTHH:MM:SS.mmmZ` times
/// 3. Writes them to stderr
///
/// # Initialization Behavior
///
/// Idempotent: only the first call in a process takes effect. Later calls, or calls
/// after another subscriber was installed, are silently ignored.
///
/// # Example
///
/// ```rust
/// use lsp_inspector::observability::init_tracing;
/// use lsp_inspector::Config;
///
/// init_tracing(&Config::default());
///
/// tracing::info!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = tracing::Level::from(config.severity).to_string();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = fmt::layer()
        .with_timer(Iso8601Millis)
        .with_target(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);

    if subscriber.try_init().is_ok() {
        tracing::debug!(severity = %config.severity, "tracing subscriber installed");
    }
}
