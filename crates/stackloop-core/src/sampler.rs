//! # Memory Sampler
//!
//! Reads a fixed-size window of stack memory from the single inferior.

use tracing::{debug, instrument};

use crate::debugger::MemoryReader;
use crate::error::{Result, StackloopError};
use crate::types::{Address, ProcessId, StackSample};

/// Reads stack windows from exactly one stopped process
///
/// Construction checks the target precondition, so a `MemorySampler` that
/// exists always has a single inferior to read from.
pub struct MemorySampler<'a>
{
    inferior: ProcessId,
    reader: &'a dyn MemoryReader,
}

impl<'a> MemorySampler<'a>
{
    /// Set up sampling against the host's inferiors
    ///
    /// ## Errors
    ///
    /// - `MultipleOrNoTargets`: `inferiors` does not hold exactly one process
    pub fn new(inferiors: &[ProcessId], reader: &'a dyn MemoryReader) -> Result<Self>
    {
        match inferiors {
            [inferior] => Ok(Self {
                inferior: *inferior,
                reader,
            }),
            _ => Err(StackloopError::MultipleOrNoTargets(inferiors.len())),
        }
    }

    /// The process being sampled.
    pub fn inferior(&self) -> ProcessId
    {
        self.inferior
    }

    /// Read `length` bytes starting at `address`
    ///
    /// ## Errors
    ///
    /// - `MemoryAccess`: the host could not read the whole range
    #[instrument(level = "debug", skip(self), fields(pid = %self.inferior))]
    pub fn sample(&self, address: Address, length: usize) -> Result<StackSample>
    {
        let bytes = self.reader.read_memory(address, length)?;
        if bytes.len() != length {
            return Err(StackloopError::MemoryAccess {
                address,
                length,
                reason: format!("short read of {} bytes", bytes.len()),
            });
        }

        let sample = StackSample::new(address, bytes);
        debug!(start = %sample.start_address(), end = %sample.end_address(), "Captured stack sample");
        Ok(sample)
    }
}
