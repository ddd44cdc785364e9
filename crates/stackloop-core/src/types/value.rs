//! Typed results of expression evaluation.

use std::fmt;

use super::Address;

/// Static type of an evaluated expression
///
/// Mirrors the distinction a debugger makes between `$sp` (a data pointer),
/// `$pc` (a code pointer), and general purpose registers (plain integers).
/// Only [`ValueType::VoidPointer`] is accepted as a sample start address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType
{
    /// `void *`
    VoidPointer,
    /// `void (*)()`
    CodePointer,
    /// 64-bit integer
    Integer,
}

impl fmt::Display for ValueType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            ValueType::VoidPointer => "void *",
            ValueType::CodePointer => "void (*)()",
            ValueType::Integer => "long",
        };
        write!(f, "{label}")
    }
}

/// A value together with its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedValue
{
    pub value: u64,
    pub ty: ValueType,
}

impl TypedValue
{
    pub const fn void_pointer(value: u64) -> Self
    {
        Self {
            value,
            ty: ValueType::VoidPointer,
        }
    }

    pub const fn code_pointer(value: u64) -> Self
    {
        Self {
            value,
            ty: ValueType::CodePointer,
        }
    }

    pub const fn integer(value: u64) -> Self
    {
        Self {
            value,
            ty: ValueType::Integer,
        }
    }

    /// The value as an address, if it is typed as `void *`.
    pub fn as_void_pointer(self) -> Option<Address>
    {
        match self.ty {
            ValueType::VoidPointer => Some(Address::from(self.value)),
            ValueType::CodePointer | ValueType::Integer => None,
        }
    }
}
