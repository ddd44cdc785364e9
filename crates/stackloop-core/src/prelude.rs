//! Common module for library exports

pub use crate::config::SampleConfig;
pub use crate::cycle::{detect, CycleMatch};
pub use crate::debugger::{DebuggerHost, HostContext, MemoryReader, SymbolLookup};
pub use crate::decode::{AlignmentPolicy, ByteOrder, PointerLayout, PointerWidth};
pub use crate::error::{Result, StackloopError};
pub use crate::pipeline::{diagnose, Diagnosis};
#[cfg(target_os = "linux")]
pub use crate::platform::linux::PtraceHost;
pub use crate::types::{Address, Architecture, MemoryRegion, ProcessId, SymbolHit, TypedValue, ValueType};
