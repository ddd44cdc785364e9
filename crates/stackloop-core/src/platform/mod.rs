//! # Platform-Specific Implementations
//!
//! Hosts that attach to a real process. Only Linux is implemented; on other
//! systems the pipeline is still usable with any [`DebuggerHost`] supplied by
//! the embedding debugger.
//!
//! [`DebuggerHost`]: crate::debugger::DebuggerHost

#[cfg(target_os = "linux")]
pub mod linux;
