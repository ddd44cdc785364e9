//! Process, memory region, and architecture types.

use std::fmt;
use std::path::PathBuf;

use super::Address;

/// Process identifier (PID)
///
/// Hosts report their inferiors as a list of `ProcessId`s; the sampler
/// insists on there being exactly one.
///
/// ```rust
/// use stackloop_core::types::ProcessId;
///
/// let pid = ProcessId::from(4242);
/// assert_eq!(u32::from(pid), 4242);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl From<u32> for ProcessId
{
    fn from(pid: u32) -> Self
    {
        ProcessId(pid)
    }
}

impl From<ProcessId> for u32
{
    fn from(pid: ProcessId) -> Self
    {
        pid.0
    }
}

impl fmt::Display for ProcessId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Memory region in a process
///
/// One line of `/proc/<pid>/maps`: a contiguous range with its permission
/// flags, the file offset it was mapped from, and the backing path (or a
/// pseudo name like `[stack]`).
///
/// ```
/// use stackloop_core::types::{Address, MemoryRegion};
///
/// let text = MemoryRegion::new(
///     Address::from(0x1000),
///     Address::from(0x2000),
///     "r-xp".to_string(),
///     0,
///     Some("/usr/bin/example".into()),
/// );
/// assert!(text.is_executable());
/// assert_eq!(text.size(), 0x1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion
{
    /// Start address of the memory region (inclusive)
    pub start: Address,
    /// End address of the memory region (exclusive)
    pub end: Address,
    /// Permission string as printed by the kernel, e.g. `"r-xp"`
    pub permissions: String,
    /// Offset into the backing file where this mapping starts
    pub offset: u64,
    /// Backing file path or pseudo name (`[heap]`, `[stack]`, `[vdso]`)
    pub path: Option<PathBuf>,
}

impl MemoryRegion
{
    /// Create a new memory region
    ///
    /// `end <= start` is not rejected; `size()` then reports 0.
    pub fn new(start: Address, end: Address, permissions: String, offset: u64, path: Option<PathBuf>) -> Self
    {
        Self {
            start,
            end,
            permissions,
            offset,
            path,
        }
    }

    /// Size of the region in bytes (saturating)
    pub fn size(&self) -> u64
    {
        self.end.value().saturating_sub(self.start.value())
    }

    /// `true` if the permission string contains `'r'`
    pub fn is_readable(&self) -> bool
    {
        self.permissions.contains('r')
    }

    /// `true` if the permission string contains `'x'`
    pub fn is_executable(&self) -> bool
    {
        self.permissions.contains('x')
    }

    /// `true` if the mapping is backed by a real file rather than a pseudo
    /// name such as `[vdso]` or an anonymous mapping.
    pub fn is_file_backed(&self) -> bool
    {
        self.path.as_ref().is_some_and(|path| path.is_absolute())
    }

    /// Check if an address lies within `[start, end)`
    ///
    /// ```rust
    /// use stackloop_core::types::{Address, MemoryRegion};
    ///
    /// let region = MemoryRegion::new(Address::from(0x1000), Address::from(0x2000), "rw-p".into(), 0, None);
    /// assert!(region.contains(Address::from(0x1000)));
    /// assert!(!region.contains(Address::from(0x2000)));
    /// ```
    pub fn contains(&self, address: Address) -> bool
    {
        address >= self.start && address < self.end
    }
}

/// CPU architecture of the target
///
/// Only the properties the sampler cares about are exposed: pointer width,
/// byte order, and the register that holds the stack pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture
{
    /// 64-bit ARM
    Arm64,
    /// 64-bit x86 (Intel/AMD)
    X86_64,
    /// Any other architecture, by name
    Unknown(&'static str),
}

impl Architecture
{
    /// Architecture of the running binary, decided at compile time
    ///
    /// Stackloop only samples processes of its own architecture.
    pub const fn current() -> Self
    {
        #[cfg(target_arch = "aarch64")]
        {
            Architecture::Arm64
        }

        #[cfg(target_arch = "x86_64")]
        {
            Architecture::X86_64
        }

        #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
        {
            Architecture::Unknown(std::env::consts::ARCH)
        }
    }

    /// Size of a pointer in bytes for this architecture.
    #[must_use]
    pub const fn pointer_size_bytes(self) -> u8
    {
        match self {
            Architecture::Arm64 | Architecture::X86_64 => 8,
            Architecture::Unknown(_) => std::mem::size_of::<usize>() as u8,
        }
    }

    /// Whether pointers are stored least-significant byte first.
    #[must_use]
    pub const fn is_little_endian(self) -> bool
    {
        match self {
            Architecture::Arm64 | Architecture::X86_64 => true,
            Architecture::Unknown(_) => cfg!(target_endian = "little"),
        }
    }

    /// Expression used when the user gives no start address
    #[must_use]
    pub const fn default_stack_expression(self) -> &'static str
    {
        match self {
            Architecture::X86_64 => "$rsp",
            Architecture::Arm64 | Architecture::Unknown(_) => "$sp",
        }
    }
}

impl fmt::Display for Architecture
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Unknown(name) => write!(f, "{name}"),
        }
    }
}
