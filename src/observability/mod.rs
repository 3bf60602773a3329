//! `tracing` subscriber setup.
//!
//! Records sent to a [`crate::sink::TracingSink`] are ordinary `tracing` events, so
//! something has to be listening. Applications that already install their own
//! subscriber can skip this module entirely; the rest call [`init_tracing`] once at
//! startup.
//!
//! # Configuration
//!
//! The filter level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `severity` in [`crate::Config`]
//! 3. Default: `"info"`

mod init;

pub use init::init_tracing;
