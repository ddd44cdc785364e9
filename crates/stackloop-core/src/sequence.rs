//! # Sequence Builder
//!
//! Turns decoded stack words into the ordered list of frames the cycle
//! detector works on.

use tracing::debug;

use crate::symbols::{Resolution, SymbolResolver};
use crate::types::Address;

/// A stack word that resolved to a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicFrame
{
    /// Function identifier
    pub identifier: String,
    /// The stack word it was resolved from
    pub address: Address,
}

/// Resolved frames in sample order
///
/// Indices here do not line up with the decoded address sequence: unresolved
/// words are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolicSequence
{
    frames: Vec<SymbolicFrame>,
}

impl SymbolicSequence
{
    pub fn frames(&self) -> &[SymbolicFrame]
    {
        &self.frames
    }

    /// Identifiers in order, which is what cycle detection compares.
    pub fn identifiers(&self) -> Vec<&str>
    {
        self.frames.iter().map(|frame| frame.identifier.as_str()).collect()
    }

    pub fn len(&self) -> usize
    {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SymbolicFrame>
    {
        self.frames.get(index)
    }
}

impl FromIterator<SymbolicFrame> for SymbolicSequence
{
    fn from_iter<I: IntoIterator<Item = SymbolicFrame>>(iter: I) -> Self
    {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

/// Resolve `addresses` in order, keeping only those that name a function
///
/// Cache hits are appended unconditionally; misses go to the host and are
/// appended (and cached) only if they resolve.
pub fn build_sequence(addresses: &[Address], resolver: &mut SymbolResolver<'_>) -> SymbolicSequence
{
    let mut frames = Vec::with_capacity(addresses.len());
    let mut dropped = 0usize;

    for &address in addresses {
        match resolver.resolve(address) {
            Resolution::Cached(identifier) | Resolution::Resolved(identifier) => {
                frames.push(SymbolicFrame { identifier, address });
            }
            Resolution::Unresolved => dropped += 1,
        }
    }

    debug!(
        resolved = frames.len(),
        dropped,
        lookups = resolver.lookups(),
        cached = resolver.cache().len(),
        "Built symbolic sequence"
    );
    SymbolicSequence { frames }
}
