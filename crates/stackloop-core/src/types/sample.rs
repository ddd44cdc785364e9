//! Raw stack sample.

use super::Address;

/// A window of raw bytes read from the inferior's stack
///
/// Captured once per invocation by [`crate::sampler::MemorySampler`] and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSample
{
    start: Address,
    bytes: Vec<u8>,
}

impl StackSample
{
    pub fn new(start: Address, bytes: Vec<u8>) -> Self
    {
        Self { start, bytes }
    }

    /// Address of the first sampled byte.
    pub fn start_address(&self) -> Address
    {
        self.start
    }

    pub fn bytes(&self) -> &[u8]
    {
        &self.bytes
    }

    pub fn byte_length(&self) -> usize
    {
        self.bytes.len()
    }

    /// One past the last sampled byte.
    pub fn end_address(&self) -> Address
    {
        self.start + self.bytes.len() as u64
    }
}
