//! # Symbol Cache
//!
//! Address → function identifier memo for one invocation.
//!
//! Only successful resolutions are stored. An address that failed to resolve
//! is looked up again every time it shows up in the sample; see
//! [`super::SymbolResolver`].

use std::collections::HashMap;

use crate::types::Address;

/// Cache of resolved identifiers, keyed by exact address
///
/// Two return addresses inside the same function are separate entries that
/// happen to map to the same identifier.
///
/// ## Thread Safety
///
/// The cache is not thread-safe and is owned by a single resolver.
#[derive(Debug, Default)]
pub struct SymbolCache
{
    entries: HashMap<Address, String>,
}

impl SymbolCache
{
    /// Create a new empty symbol cache.
    #[must_use]
    pub fn new() -> Self
    {
        Self { entries: HashMap::new() }
    }

    pub fn get(&self, address: Address) -> Option<&str>
    {
        self.entries.get(&address).map(String::as_str)
    }

    pub fn insert(&mut self, address: Address, identifier: String)
    {
        self.entries.insert(address, identifier);
    }

    pub fn contains(&self, address: Address) -> bool
    {
        self.entries.contains_key(&address)
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }
}
