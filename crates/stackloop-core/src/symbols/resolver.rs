//! Cached symbol resolution.

use tracing::trace;

use super::cache::SymbolCache;
use crate::debugger::SymbolLookup;
use crate::types::Address;

/// Outcome of resolving one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution
{
    /// Served from the cache without asking the host
    Cached(String),
    /// Looked up and added to the cache
    Resolved(String),
    /// Not inside a named symbol; nothing was cached
    Unresolved,
}

impl Resolution
{
    /// The identifier, unless unresolved.
    pub fn identifier(&self) -> Option<&str>
    {
        match self {
            Resolution::Cached(identifier) | Resolution::Resolved(identifier) => Some(identifier),
            Resolution::Unresolved => None,
        }
    }
}

/// Maps addresses to function identifiers through the host, memoizing hits
///
/// Misses are deliberately not remembered: every occurrence of an
/// unresolvable address costs one host lookup.
pub struct SymbolResolver<'a>
{
    lookup: &'a dyn SymbolLookup,
    cache: SymbolCache,
    lookups: usize,
}

impl<'a> SymbolResolver<'a>
{
    pub fn new(lookup: &'a dyn SymbolLookup) -> Self
    {
        Self {
            lookup,
            cache: SymbolCache::new(),
            lookups: 0,
        }
    }

    /// Resolve `address`, consulting the cache first
    pub fn resolve(&mut self, address: Address) -> Resolution
    {
        if let Some(identifier) = self.cache.get(address) {
            trace!(%address, identifier, "Symbol cache hit");
            return Resolution::Cached(identifier.to_string());
        }

        self.lookups += 1;
        match self.lookup.lookup_symbol(address) {
            Some(hit) => {
                trace!(%address, %hit, "Resolved symbol");
                self.cache.insert(address, hit.identifier.clone());
                Resolution::Resolved(hit.identifier)
            }
            None => {
                trace!(%address, "Address is not inside a named symbol");
                Resolution::Unresolved
            }
        }
    }

    /// Number of lookups forwarded to the host so far.
    pub fn lookups(&self) -> usize
    {
        self.lookups
    }

    pub fn cache(&self) -> &SymbolCache
    {
        &self.cache
    }
}
