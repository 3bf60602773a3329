//! Domain layer for the inspector.
//!
//! This module contains the trace-record vocabulary shared by the formatter and the
//! sinks, independent of where records end up.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`kind`]: Message kind taxonomy
//! - [`level`]: Trace verbosity gate and record severity
//! - [`format`]: Output line encoding
//! - [`payload`]: Caller-side event description and request correlation state

pub mod error;
pub mod format;
pub mod kind;
pub mod level;
pub mod payload;

pub use error::{InspectorError, Result};
pub use format::LogFormat;
pub use kind::{MessageKind, UnknownKind};
pub use level::{Severity, TraceLevel};
pub use payload::{Payload, RequestMetadata, ResponseStatus};
