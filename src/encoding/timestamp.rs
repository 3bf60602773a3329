//! Millisecond-precision ISO-8601 UTC timestamps.
//!
//! Produces the fixed-width `YYYY-MM-DDTHH:MM:SS.mmmZ` form, equivalent to
//! formatting with `%Y-%m-%dT%H:%M:%S%.3fZ` but written digit by digit into a stack
//! buffer, with no format-string parsing and no locale involvement.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Length of every encoded timestamp.
pub const TIMESTAMP_LEN: usize = 24;

/// An encoded timestamp.
///
/// The buffer only ever holds ASCII digits and the separators `-T:.Z`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    buf: [u8; TIMESTAMP_LEN],
}

impl Timestamp {
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf).unwrap_or_default()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TIMESTAMP_LEN] {
        &self.buf
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timestamp").field(&self.as_str()).finish()
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Encodes an instant, converting it to UTC first.
///
/// Only the last four digits of the year are kept; years outside `0..=9999` are not
/// representable. A leap second's millisecond field saturates at `999`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lsp_inspector::encoding::encode_timestamp;
///
/// let t = Utc.with_ymd_and_hms(2021, 3, 4, 10, 15, 30).unwrap()
///     + chrono::TimeDelta::milliseconds(123);
/// assert_eq!(encode_timestamp(&t).as_str(), "2021-03-04T10:15:30.123Z");
/// ```
#[must_use]
pub fn encode_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> Timestamp {
    let t = t.with_timezone(&Utc);
    let year = t.year().rem_euclid(10_000).unsigned_abs();
    let millis = (t.nanosecond() / 1_000_000).min(999);

    let mut buf = [0u8; TIMESTAMP_LEN];
    put_digits(&mut buf[0..4], year);
    buf[4] = b'-';
    put_digits(&mut buf[5..7], t.month());
    buf[7] = b'-';
    put_digits(&mut buf[8..10], t.day());
    buf[10] = b'T';
    put_digits(&mut buf[11..13], t.hour());
    buf[13] = b':';
    put_digits(&mut buf[14..16], t.minute());
    buf[16] = b':';
    put_digits(&mut buf[17..19], t.second());
    buf[19] = b'.';
    put_digits(&mut buf[20..23], millis);
    buf[23] = b'Z';

    Timestamp { buf }
}

/// Writes `value` as zero-padded decimal filling all of `out`.
fn put_digits(out: &mut [u8], mut value: u32) {
    for slot in out.iter_mut().rev() {
        // value % 10 always fits in a u8
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

/// `tracing-subscriber` timer that stamps lines with [`encode_timestamp`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601Millis;

impl FormatTime for Iso8601Millis {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        w.write_str(encode_timestamp(&Utc::now()).as_str())
    }
}
