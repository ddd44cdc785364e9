//! # Linux
//!
//! Live process access through `ptrace(2)` and `/proc`:
//!
//! - [`host::PtraceHost`]: attach, stop, read memory and registers
//! - [`maps`]: `/proc/<pid>/maps` parsing
//! - [`elf`] and [`images`]: text symbols of every executable mapping
//! - [`registers`]: register snapshot exposed to start address expressions
//!
//! See: [ptrace(2) man page](https://man7.org/linux/man-pages/man2/ptrace.2.html)

pub mod elf;
pub mod host;
pub mod images;
pub mod maps;
pub mod registers;

pub use host::PtraceHost;
