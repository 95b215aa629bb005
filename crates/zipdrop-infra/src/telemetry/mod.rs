//! Telemetry initialization
//!
//! Installs the global `tracing` subscriber used by every crate in the workspace.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, TelemetryOptions};
