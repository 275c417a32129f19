//! `env_logger` setup for the demo binary. The library only emits through
//! the `log` macros and never installs a logger itself.

mod init;

pub use init::{init_logging, LoggingConfig, LOG_ENV};
