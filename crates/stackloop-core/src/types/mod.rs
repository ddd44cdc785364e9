//! # Types
//!
//! Platform-agnostic types shared by the sampling pipeline and the hosts.
//!
//! These types abstract away where the data comes from, so the decoder,
//! resolver, and cycle detector work the same whether the host is a live
//! `ptrace` session or an in-memory fake.

pub mod address;
pub mod process;
pub mod sample;
pub mod symbols;
pub mod value;

// Re-export all public types
pub use address::Address;
pub use process::{Architecture, MemoryRegion, ProcessId};
pub use sample::StackSample;
pub use symbols::SymbolHit;
pub use value::{TypedValue, ValueType};
