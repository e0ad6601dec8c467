//! Logging bootstrap.
//!
//! The engine itself only emits through the `log` facade; binaries call
//! [`init_logging`] once to route records to `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
