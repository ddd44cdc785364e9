//! # stackloop utilities
//!
//! Shared helpers for the stackloop workspace. Currently that is logging
//! setup built on `tracing`.

pub mod logging;

pub use logging::{LogFormat, LogLevel, LoggingError, LoggingGuard, init_logging, init_logging_with_level};
pub use tracing::{debug, error, info, trace, warn};
