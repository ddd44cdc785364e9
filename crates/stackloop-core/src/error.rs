//! # Error Types
//!
//! General error handling for stack sampling and recursion detection.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::Address;

/// Main error type for stackloop operations
///
/// Every variant is fatal for the current invocation. Nothing is retried:
/// the target is only meaningful while it is stopped, so a failed read is
/// surfaced immediately instead of being attempted again.
///
/// ## Error Categories
///
/// 1. **Argument errors**: InvalidArgument, Expression
/// 2. **Target errors**: MultipleOrNoTargets, ProcessNotFound, PermissionDenied, AttachFailed
/// 3. **Memory errors**: MemoryAccess, ByteAlignment
/// 4. **Symbol errors**: SymbolTable
/// 5. **Platform errors**: Ptrace (Linux-specific)
/// 6. **I/O errors**: Io
///
/// Finding no recurring pattern is *not* an error; see
/// [`crate::cycle::detect`].
#[derive(Error, Debug)]
pub enum StackloopError
{
    /// The start address argument is unusable
    ///
    /// Raised when the evaluated expression is not a `void *` value, or when
    /// the sampling configuration is nonsensical (zero-length sample, sample
    /// shorter than one pointer).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The start address expression could not be evaluated
    ///
    /// Syntax errors, unknown registers, and unsupported operators end up here.
    #[error("Cannot evaluate `{expression}`: {reason}")]
    Expression
    {
        /// The expression as given by the user
        expression: String,
        /// What went wrong
        reason: String,
    },

    /// The host is not attached to exactly one inferior
    ///
    /// Sampling needs a single, unambiguous target. This is checked before
    /// any memory is read.
    #[error("Expected exactly one inferior process, found {0}")]
    MultipleOrNoTargets(usize),

    /// The requested memory range could not be read
    ///
    /// Either the range is unmapped or the inferior is not in a readable
    /// (stopped) state. The reason is the host's own message.
    #[error("Cannot access memory at {address} ({length} bytes): {reason}")]
    MemoryAccess
    {
        /// First byte of the requested range
        address: Address,
        /// Number of bytes requested
        length: usize,
        /// Host-provided failure description
        reason: String,
    },

    /// The sample length is not a whole number of pointers
    ///
    /// Only produced under [`crate::decode::AlignmentPolicy::Strict`]; the
    /// default policy truncates the trailing partial pointer instead.
    #[error("Sample of {length} bytes is not a multiple of the {pointer_size}-byte pointer size")]
    ByteAlignment
    {
        /// Length of the byte window
        length: usize,
        /// Configured pointer width
        pointer_size: usize,
    },

    /// The process with the given PID doesn't exist or has exited
    #[error("Process not found: PID {0}")]
    ProcessNotFound(u32),

    /// Insufficient permissions to trace the target process
    ///
    /// On Linux this usually means `kernel.yama.ptrace_scope` forbids
    /// attaching, or `CAP_SYS_PTRACE` is missing.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Failed to attach to a process
    #[error("Failed to attach to process: {0}")]
    AttachFailed(String),

    /// A binary image's symbol table could not be loaded
    #[error("Symbol table error: {0}")]
    SymbolTable(String),

    /// Raw `ptrace`/`waitpid` failure
    #[cfg(target_os = "linux")]
    #[error("ptrace error: {0}")]
    Ptrace(#[from] nix::errno::Errno),

    /// I/O error (reading `/proc`, binary images, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, StackloopError>`
///
/// ```rust
/// use stackloop_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StackloopError>;
