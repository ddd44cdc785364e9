//! # Sampling Configuration
//!
//! Compile-time defaults for how much stack to read and how to decode it,
//! with a validated override path for the CLI.

use tracing::warn;

use crate::decode::{AlignmentPolicy, ByteOrder, PointerLayout, PointerWidth};
use crate::error::{Result, StackloopError};
use crate::types::Architecture;

/// Pointer size of the reference configuration, in bytes
pub const DEFAULT_POINTER_SIZE: usize = 8;

/// Bytes read from the stack per invocation (128 pointers)
pub const DEFAULT_SAMPLE_LENGTH: usize = 1024;

/// How a stack sample is taken and decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig
{
    /// Pointer width and byte order of the inferior
    pub layout: PointerLayout,
    /// Number of bytes to read from the start address
    pub sample_length: usize,
    /// Handling of a trailing partial pointer
    pub alignment: AlignmentPolicy,
}

impl Default for SampleConfig
{
    fn default() -> Self
    {
        Self {
            layout: PointerLayout::LP64_LE,
            sample_length: DEFAULT_SAMPLE_LENGTH,
            alignment: AlignmentPolicy::Truncate,
        }
    }
}

impl SampleConfig
{
    /// Defaults with the pointer layout of `architecture`
    pub fn for_architecture(architecture: Architecture) -> Self
    {
        let width = PointerWidth::from_bytes(architecture.pointer_size_bytes()).unwrap_or(PointerWidth::Eight);
        let byte_order = if architecture.is_little_endian() {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };

        Self {
            layout: PointerLayout::new(width, byte_order),
            ..Self::default()
        }
    }

    /// Override the sample length
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: zero, or shorter than a single pointer
    pub fn with_sample_length(mut self, sample_length: usize) -> Result<Self>
    {
        self.sample_length = sample_length;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self
    {
        self.alignment = alignment;
        self
    }

    /// Number of pointers a full sample decodes to.
    pub fn pointer_count(&self) -> usize
    {
        self.sample_length / self.layout.pointer_size()
    }

    /// Check the configuration before any memory is read
    ///
    /// Larger-than-default samples are allowed but logged: the cycle detector
    /// is cubic in the number of pointers in the worst case.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: the sample cannot hold a single pointer
    pub fn validate(&self) -> Result<()>
    {
        let pointer_size = self.layout.pointer_size();
        if self.sample_length < pointer_size {
            return Err(StackloopError::InvalidArgument(format!(
                "sample length {} is shorter than one {pointer_size}-byte pointer",
                self.sample_length
            )));
        }

        if self.sample_length > DEFAULT_SAMPLE_LENGTH {
            warn!(
                sample_length = self.sample_length,
                default = DEFAULT_SAMPLE_LENGTH,
                "Sample length above default; cycle detection is cubic in the pointer count"
            );
        }

        Ok(())
    }
}
