//! Shared infrastructure for the poly workspace.
//!
//! Currently this is the logging layer: a [`logging::LogConfig`] describing
//! level, output target, and format, plus [`logging::init_logging`] which
//! installs the global `tracing` subscriber. Binaries call it once at
//! startup before doing anything else.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
