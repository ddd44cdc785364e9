//! # Debugger Host Traits
//!
//! The interface between the sampling pipeline and whatever owns the stopped
//! target process.
//!
//! The pipeline never talks to `ptrace` (or a debugger's scripting API)
//! directly. It receives an explicit [`HostContext`], a pair of capabilities:
//!
//! - a [`MemoryReader`] to fetch raw bytes from the inferior, and
//! - a [`SymbolLookup`] to map a code address to "symbol + offset".
//!
//! The wider [`DebuggerHost`] trait adds the two operations only the
//! pipeline's setup needs: listing inferiors and evaluating the start
//! address expression. Tests substitute an in-memory host; the CLI uses
//! [`crate::platform::linux::PtraceHost`].

use crate::error::Result;
use crate::types::{Address, Architecture, ProcessId, SymbolHit, TypedValue};

/// Raw memory access to the stopped inferior
pub trait MemoryReader
{
    /// Read exactly `length` bytes starting at `address`
    ///
    /// ## Errors
    ///
    /// - `MemoryAccess`: the range is (partly) unmapped, or the inferior is
    ///   not stopped. Short reads are reported as errors too.
    fn read_memory(&self, address: Address, length: usize) -> Result<Vec<u8>>;
}

/// Address to "named symbol plus offset" lookup
pub trait SymbolLookup
{
    /// Look up the symbol whose range contains `address`
    ///
    /// Returns `None` when the address is not inside any named symbol. Lookups
    /// never fail hard: an address that cannot be resolved is simply
    /// unresolved.
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>;
}

/// A debugger session attached to the process being diagnosed
///
/// ## Thread Safety
///
/// Hosts are used from a single thread for the length of one invocation;
/// nothing here requires `Send` or `Sync`.
pub trait DebuggerHost: MemoryReader + SymbolLookup
{
    /// Processes the host is currently attached to
    ///
    /// Sampling requires exactly one entry.
    fn current_inferiors(&self) -> Vec<ProcessId>;

    /// Evaluate a debugger expression such as `$rsp + 0x28`
    ///
    /// ## Errors
    ///
    /// - `Expression`: syntax errors, unknown registers
    fn evaluate_expression(&self, expression: &str) -> Result<TypedValue>;

    /// Architecture of the inferior
    fn architecture(&self) -> Architecture
    {
        Architecture::current()
    }
}

impl<T: MemoryReader + ?Sized> MemoryReader for &T
{
    fn read_memory(&self, address: Address, length: usize) -> Result<Vec<u8>>
    {
        (**self).read_memory(address, length)
    }
}

impl<T: SymbolLookup + ?Sized> SymbolLookup for &T
{
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>
    {
        (**self).lookup_symbol(address)
    }
}

impl<T: MemoryReader + ?Sized> MemoryReader for Box<T>
{
    fn read_memory(&self, address: Address, length: usize) -> Result<Vec<u8>>
    {
        (**self).read_memory(address, length)
    }
}

impl<T: SymbolLookup + ?Sized> SymbolLookup for Box<T>
{
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>
    {
        (**self).lookup_symbol(address)
    }
}

/// The capabilities a single pipeline run borrows from its host
///
/// ```rust
/// use stackloop_core::debugger::{HostContext, MemoryReader, SymbolLookup};
/// use stackloop_core::types::{Address, SymbolHit};
///
/// struct Zeroes;
///
/// impl MemoryReader for Zeroes
/// {
///     fn read_memory(&self, _address: Address, length: usize) -> stackloop_core::Result<Vec<u8>>
///     {
///         Ok(vec![0; length])
///     }
/// }
///
/// impl SymbolLookup for Zeroes
/// {
///     fn lookup_symbol(&self, _address: Address) -> Option<SymbolHit>
///     {
///         None
///     }
/// }
///
/// let host = Zeroes;
/// let context = HostContext::new(&host, &host);
/// assert_eq!(context.memory().read_memory(Address::ZERO, 4)?, vec![0; 4]);
/// # Ok::<(), stackloop_core::StackloopError>(())
/// ```
#[derive(Clone, Copy)]
pub struct HostContext<'a>
{
    memory: &'a dyn MemoryReader,
    symbols: &'a dyn SymbolLookup,
}

impl<'a> HostContext<'a>
{
    pub fn new(memory: &'a dyn MemoryReader, symbols: &'a dyn SymbolLookup) -> Self
    {
        Self { memory, symbols }
    }

    pub fn memory(&self) -> &'a dyn MemoryReader
    {
        self.memory
    }

    pub fn symbols(&self) -> &'a dyn SymbolLookup
    {
        self.symbols
    }
}

/// Attach to `pid` with the host for the current platform
///
/// The process is stopped on return and stays stopped until the host is
/// dropped.
///
/// ## Platform Support
///
/// - ✅ Linux: Returns `PtraceHost`
/// - ⏳ Other platforms: `AttachFailed`
///
/// ## Errors
///
/// - `ProcessNotFound`, `PermissionDenied`, `AttachFailed`, `Ptrace`
pub fn attach_host(pid: ProcessId) -> Result<Box<dyn DebuggerHost>>
{
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(crate::platform::linux::PtraceHost::attach(pid)?))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(crate::error::StackloopError::AttachFailed(format!(
            "cannot attach to {pid}: no host implemented for platform {}",
            std::env::consts::OS
        )))
    }
}
