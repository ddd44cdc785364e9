//! # Symbols
//!
//! Turning raw stack words into function identifiers.
//!
//! - [`SymbolResolver`] asks the host's [`crate::debugger::SymbolLookup`] and
//!   memoizes successful answers in a [`SymbolCache`].
//! - [`TextSymbolLookup`] adapts hosts that only produce
//!   `<identifier> + <offset> in section <section>` strings.
//!
//! Names are reported exactly as they appear in the symbol table; no
//! demangling is attempted.

pub mod cache;
pub mod resolver;
pub mod text;

pub use cache::SymbolCache;
pub use resolver::{Resolution, SymbolResolver};
pub use text::{parse_symbol_description, TextSymbolLookup};
