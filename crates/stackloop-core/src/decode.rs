//! # Address Decoder
//!
//! Splits a raw stack sample into pointer-sized words.

use tracing::debug;

use crate::error::{Result, StackloopError};
use crate::types::Address;

/// Byte order of pointers in the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder
{
    Little,
    Big,
}

/// Width of a pointer in the inferior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth
{
    Four,
    Eight,
}

impl PointerWidth
{
    pub const fn bytes(self) -> usize
    {
        match self {
            PointerWidth::Four => 4,
            PointerWidth::Eight => 8,
        }
    }

    /// Width for a byte count, if supported.
    pub const fn from_bytes(bytes: u8) -> Option<Self>
    {
        match bytes {
            4 => Some(PointerWidth::Four),
            8 => Some(PointerWidth::Eight),
            _ => None,
        }
    }
}

/// How pointers are laid out in the inferior's memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerLayout
{
    pub width: PointerWidth,
    pub byte_order: ByteOrder,
}

impl PointerLayout
{
    /// 64-bit little endian (x86-64, arm64).
    pub const LP64_LE: Self = Self {
        width: PointerWidth::Eight,
        byte_order: ByteOrder::Little,
    };

    pub const fn new(width: PointerWidth, byte_order: ByteOrder) -> Self
    {
        Self { width, byte_order }
    }

    pub const fn pointer_size(self) -> usize
    {
        self.width.bytes()
    }

    /// Decode a single pointer; `chunk` must be exactly `pointer_size()` long.
    fn read(self, chunk: &[u8]) -> u64
    {
        let mut word = [0u8; 8];
        match (self.width, self.byte_order) {
            (PointerWidth::Eight, ByteOrder::Little) => {
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            }
            (PointerWidth::Eight, ByteOrder::Big) => {
                word.copy_from_slice(chunk);
                u64::from_be_bytes(word)
            }
            (PointerWidth::Four, ByteOrder::Little) => {
                let mut half = [0u8; 4];
                half.copy_from_slice(chunk);
                u64::from(u32::from_le_bytes(half))
            }
            (PointerWidth::Four, ByteOrder::Big) => {
                let mut half = [0u8; 4];
                half.copy_from_slice(chunk);
                u64::from(u32::from_be_bytes(half))
            }
        }
    }
}

impl Default for PointerLayout
{
    fn default() -> Self
    {
        Self::LP64_LE
    }
}

/// What to do with a trailing partial pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy
{
    /// Drop the partial tail (logged at `debug`)
    #[default]
    Truncate,
    /// Fail with `ByteAlignment`
    Strict,
}

/// Decode `bytes` into `floor(len / pointer_size)` addresses, in order
///
/// ```rust
/// use stackloop_core::decode::{decode_addresses, AlignmentPolicy, PointerLayout};
/// use stackloop_core::types::Address;
///
/// let bytes = [0x10, 0, 0, 0, 0, 0, 0, 0, 0x20, 0, 0, 0, 0, 0, 0, 0];
/// let addresses = decode_addresses(&bytes, PointerLayout::LP64_LE, AlignmentPolicy::Truncate)?;
/// assert_eq!(addresses, vec![Address::from(0x10), Address::from(0x20)]);
/// # Ok::<(), stackloop_core::StackloopError>(())
/// ```
///
/// ## Errors
///
/// - `ByteAlignment`: only under [`AlignmentPolicy::Strict`] when the length
///   is not a multiple of the pointer size
pub fn decode_addresses(bytes: &[u8], layout: PointerLayout, policy: AlignmentPolicy) -> Result<Vec<Address>>
{
    let pointer_size = layout.pointer_size();
    let tail = bytes.len() % pointer_size;

    if tail != 0 {
        match policy {
            AlignmentPolicy::Strict => {
                return Err(StackloopError::ByteAlignment {
                    length: bytes.len(),
                    pointer_size,
                });
            }
            AlignmentPolicy::Truncate => {
                debug!(tail, pointer_size, "Discarding trailing partial pointer");
            }
        }
    }

    let addresses: Vec<Address> = bytes
        .chunks_exact(pointer_size)
        .map(|chunk| Address::from(layout.read(chunk)))
        .collect();

    debug!(count = addresses.len(), "Decoded stack sample");
    Ok(addresses)
}
