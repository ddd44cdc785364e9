//! Adapter for hosts that describe symbols as text.
//!
//! Debuggers answer `info symbol <addr>` with lines like
//! `recurse + 23 in section .text`. This module turns such a line into a
//! [`SymbolHit`]; anything that does not match (including the `+ 0` free
//! form `recurse in section .text` and `No symbol matches ...`) is treated as
//! unresolved.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::debugger::SymbolLookup;
use crate::types::{Address, SymbolHit};

static SYMBOL_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_]*) \+ (\d+) in section (\S+)").expect("symbol description pattern is valid")
});

/// Parse an `info symbol` style description
///
/// ```rust
/// use stackloop_core::symbols::parse_symbol_description;
///
/// let hit = parse_symbol_description("camlMain__loop_1234 + 23 in section .text").unwrap();
/// assert_eq!(hit.identifier, "camlMain__loop_1234");
/// assert_eq!(hit.offset, 23);
/// assert_eq!(hit.section, ".text");
///
/// assert!(parse_symbol_description("No symbol matches 0x1234.").is_none());
/// ```
pub fn parse_symbol_description(text: &str) -> Option<SymbolHit>
{
    let captures = SYMBOL_DESCRIPTION.captures(text.trim())?;
    let offset = captures[2].parse().ok()?;
    Some(SymbolHit::new(&captures[1], offset, &captures[3]))
}

/// [`SymbolLookup`] over a function returning free-form descriptions
pub struct TextSymbolLookup<F>
{
    describe: F,
}

impl<F> TextSymbolLookup<F>
where
    F: Fn(Address) -> Option<String>,
{
    pub fn new(describe: F) -> Self
    {
        Self { describe }
    }
}

impl<F> SymbolLookup for TextSymbolLookup<F>
where
    F: Fn(Address) -> Option<String>,
{
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>
    {
        (self.describe)(address).and_then(|text| parse_symbol_description(&text))
    }
}
