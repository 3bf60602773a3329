//! Text encoders used while building trace records.
//!
//! - [`timestamp`]: fixed-width millisecond ISO-8601 UTC stamps
//! - [`body`]: four-space indented JSON bodies with their context label
//! - [`latency`]: millisecond latency rendering

pub mod body;
pub mod latency;
pub mod timestamp;

pub use body::{render_body, to_indented_json, BodyLabel};
pub use latency::{duration_ms, LatencyDisplay};
pub use timestamp::{encode_timestamp, Iso8601Millis, Timestamp, TIMESTAMP_LEN};
