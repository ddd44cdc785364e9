//! Linux ptrace host
//!
//! Attaches to a live process, stops it, and serves memory reads, symbol
//! lookups, and register expressions for the diagnosis pipeline.

use std::fs::File;
use std::os::unix::fs::FileExt;

use nix::errno::Errno;
use nix::sys::ptrace;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use once_cell::unsync::OnceCell;
use tracing::{debug, info, warn};

use super::images::ImageIndex;
use super::registers::read_registers;
use crate::debugger::{DebuggerHost, MemoryReader, SymbolLookup};
use crate::error::{Result, StackloopError};
use crate::expr::{evaluate, RegisterFile};
use crate::types::{Address, Architecture, ProcessId, SymbolHit, TypedValue};

/// A stopped, ptrace-attached process
///
/// The process stays stopped for the lifetime of the host and is detached
/// on drop.
#[derive(Debug)]
pub struct PtraceHost
{
    pid: Pid,
    memory: File,
    registers: RegisterFile,
    images: OnceCell<Option<ImageIndex>>,
    attached: bool,
}

impl PtraceHost
{
    /// Attach to `pid` and wait until it stops
    ///
    /// ## Errors
    ///
    /// - `ProcessNotFound`: no such process, or it exited while attaching
    /// - `PermissionDenied`: ptrace is not allowed for this process
    /// - `AttachFailed`: any other attach failure
    pub fn attach(pid: ProcessId) -> Result<Self>
    {
        let raw = i32::try_from(pid.0).map_err(|_| StackloopError::ProcessNotFound(pid.0))?;
        let target = Pid::from_raw(raw);

        ptrace::attach(target).map_err(|errno| attach_error(pid, errno))?;
        debug!(%pid, "PTRACE_ATTACH sent");

        let stopped = wait_for_stop(target, pid).and_then(|()| {
            let registers = read_registers(target)?;
            let memory = File::open(format!("/proc/{pid}/mem"))?;
            Ok((registers, memory))
        });
        let (registers, memory) = match stopped {
            Ok(stopped) => stopped,
            Err(err) => {
                // Fails harmlessly if the process is already gone
                let _ = ptrace::detach(target, None);
                return Err(err);
            }
        };

        info!(%pid, registers = registers.len(), "Attached to process");
        Ok(Self {
            pid: target,
            memory,
            registers,
            images: OnceCell::new(),
            attached: true,
        })
    }

    pub fn pid(&self) -> ProcessId
    {
        ProcessId(self.pid.as_raw().unsigned_abs())
    }

    /// Registers captured when the process stopped
    pub fn registers(&self) -> &RegisterFile
    {
        &self.registers
    }

    /// Executable mappings, loaded on first use
    ///
    /// `None` if `/proc/<pid>/maps` could not be read. The failure is logged
    /// once and not retried.
    pub fn images(&self) -> Option<&ImageIndex>
    {
        let pid = self.pid();
        load_once(&self.images, || ImageIndex::load(pid))
    }

    /// Detach and let the process continue
    ///
    /// ## Errors
    ///
    /// - `Ptrace`: `PTRACE_DETACH` failed
    pub fn detach(mut self) -> Result<()>
    {
        self.attached = false;
        ptrace::detach(self.pid, None)?;
        info!(pid = %self.pid(), "Detached from process");
        Ok(())
    }
}

fn load_once<'a>(
    cell: &'a OnceCell<Option<ImageIndex>>,
    load: impl FnOnce() -> Result<ImageIndex>,
) -> Option<&'a ImageIndex>
{
    let images = cell.get_or_init(|| match load() {
        Ok(images) => Some(images),
        Err(err) => {
            warn!(error = %err, "Symbol lookup unavailable; addresses stay unresolved");
            None
        }
    });
    images.as_ref()
}

fn wait_for_stop(target: Pid, pid: ProcessId) -> Result<()>
{
    loop {
        match waitpid(target, Some(WaitPidFlag::__WALL))? {
            WaitStatus::Stopped(_, signal) => {
                debug!(%pid, ?signal, "Process stopped");
                return Ok(());
            }
            WaitStatus::Exited(..) | WaitStatus::Signaled(..) => return Err(StackloopError::ProcessNotFound(pid.0)),
            status => debug!(%pid, ?status, "Waiting for attach stop"),
        }
    }
}

impl MemoryReader for PtraceHost
{
    fn read_memory(&self, address: Address, length: usize) -> Result<Vec<u8>>
    {
        let mut buffer = vec![0u8; length];
        self.memory
            .read_exact_at(&mut buffer, address.value())
            .map_err(|err| StackloopError::MemoryAccess {
                address,
                length,
                reason: err.to_string(),
            })?;
        Ok(buffer)
    }
}

impl SymbolLookup for PtraceHost
{
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>
    {
        self.images()?.lookup(address)
    }
}

impl DebuggerHost for PtraceHost
{
    fn current_inferiors(&self) -> Vec<ProcessId>
    {
        vec![self.pid()]
    }

    fn evaluate_expression(&self, expression: &str) -> Result<TypedValue>
    {
        evaluate(expression, &self.registers)
    }

    fn architecture(&self) -> Architecture
    {
        Architecture::current()
    }
}

impl Drop for PtraceHost
{
    fn drop(&mut self)
    {
        if self.attached {
            if let Err(errno) = ptrace::detach(self.pid, None) {
                warn!(pid = %self.pid(), %errno, "Failed to detach from process");
            }
        }
    }
}

fn attach_error(pid: ProcessId, errno: Errno) -> StackloopError
{
    match errno {
        Errno::ESRCH => StackloopError::ProcessNotFound(pid.0),
        Errno::EPERM => StackloopError::PermissionDenied(format!(
            "ptrace attach to {pid} refused; check /proc/sys/kernel/yama/ptrace_scope or run with CAP_SYS_PTRACE"
        )),
        other => StackloopError::AttachFailed(format!("ptrace attach to {pid} failed: {other}")),
    }
}
