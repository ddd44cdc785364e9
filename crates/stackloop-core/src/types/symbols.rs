//! Symbol lookup results.

use std::fmt;

/// A successful "named symbol plus offset" lookup
///
/// This is what a debugger prints for `info symbol <addr>`:
/// `recurse + 23 in section .text`. Hosts hand it over in typed form so the
/// resolver never has to re-parse text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolHit
{
    /// Function identifier (the raw, undemangled symbol name)
    pub identifier: String,
    /// Byte offset of the address from the symbol start
    pub offset: u64,
    /// Name of the section containing the symbol
    pub section: String,
}

impl SymbolHit
{
    /// Build a hit from its parts.
    pub fn new(identifier: impl Into<String>, offset: u64, section: impl Into<String>) -> Self
    {
        Self {
            identifier: identifier.into(),
            offset,
            section: section.into(),
        }
    }
}

impl fmt::Display for SymbolHit
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} + {} in section {}", self.identifier, self.offset, self.section)
    }
}
