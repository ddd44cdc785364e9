//! # stackloop-core
//!
//! Find the recurring call pattern in the stack of a process that overflowed
//! it through runaway recursion.
//!
//! A stopped process's stack is sampled as raw bytes, decoded into
//! pointer-sized words, and every word that lands inside a named function is
//! kept as one element of a symbolic sequence. The shortest block that tiles
//! the tail of that sequence is the recursion:
//!
//! ```text
//! sample ─▶ decode ─▶ resolve (cached) ─▶ sequence ─▶ detect ─▶ report
//! ```
//!
//! Everything below the host boundary ([`debugger::DebuggerHost`]) is pure
//! and can run against an in-memory fake. On Linux,
//! [`platform::linux::PtraceHost`] attaches to a live process.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stackloop_core::{attach_host, diagnose, ProcessId, SampleConfig};
//!
//! let host = attach_host(ProcessId::from(4242))?;
//! let config = SampleConfig::for_architecture(host.architecture());
//! let diagnosis = diagnose(host.as_ref(), None, &config)?;
//! println!("{}", diagnosis.report());
//! # Ok::<(), stackloop_core::StackloopError>(())
//! ```

pub mod config;
pub mod cycle;
pub mod debugger;
pub mod decode;
pub mod error;
pub mod expr;
pub mod pipeline;
pub mod platform;
pub mod prelude;
pub mod report;
pub mod sampler;
pub mod sequence;
pub mod symbols;
pub mod types;

pub use config::SampleConfig;
pub use cycle::{detect, CycleMatch};
pub use debugger::{attach_host, DebuggerHost, HostContext, MemoryReader, SymbolLookup};
pub use error::{Result, StackloopError};
pub use pipeline::{diagnose, sample_and_detect, Diagnosis};
pub use types::{Address, ProcessId, SymbolHit, TypedValue};
