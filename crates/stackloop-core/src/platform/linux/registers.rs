//! Register snapshot of a stopped tracee
//!
//! Registers are exposed to start address expressions under their usual
//! debugger names. Stack and frame pointers are typed `void *`, the program
//! counter is a code pointer, and everything else is a plain integer.

use nix::unistd::Pid;

use crate::error::Result;
use crate::expr::RegisterFile;
use crate::types::TypedValue;

/// Read the general purpose registers of `pid`
///
/// ## Errors
///
/// - `Ptrace`: `PTRACE_GETREGS` / `PTRACE_GETREGSET` failed
#[cfg(target_arch = "x86_64")]
pub fn read_registers(pid: Pid) -> Result<RegisterFile>
{
    let regs = nix::sys::ptrace::getregs(pid)?;

    let mut file = RegisterFile::new()
        .with("rsp", TypedValue::void_pointer(regs.rsp))
        .with("sp", TypedValue::void_pointer(regs.rsp))
        .with("rbp", TypedValue::void_pointer(regs.rbp))
        .with("fp", TypedValue::void_pointer(regs.rbp))
        .with("rip", TypedValue::code_pointer(regs.rip))
        .with("pc", TypedValue::code_pointer(regs.rip))
        .with("eflags", TypedValue::integer(regs.eflags));

    let general = [
        ("rax", regs.rax),
        ("rbx", regs.rbx),
        ("rcx", regs.rcx),
        ("rdx", regs.rdx),
        ("rsi", regs.rsi),
        ("rdi", regs.rdi),
        ("r8", regs.r8),
        ("r9", regs.r9),
        ("r10", regs.r10),
        ("r11", regs.r11),
        ("r12", regs.r12),
        ("r13", regs.r13),
        ("r14", regs.r14),
        ("r15", regs.r15),
    ];
    for (name, value) in general {
        file.insert(name, TypedValue::integer(value));
    }

    Ok(file)
}

/// Read the general purpose registers of `pid`
///
/// ## Errors
///
/// - `Ptrace`: `PTRACE_GETREGS` / `PTRACE_GETREGSET` failed
#[cfg(target_arch = "aarch64")]
pub fn read_registers(pid: Pid) -> Result<RegisterFile>
{
    use nix::sys::ptrace;

    let regs = ptrace::getregset::<ptrace::regset::NT_PRSTATUS>(pid)?;

    let mut file = RegisterFile::new()
        .with("sp", TypedValue::void_pointer(regs.sp))
        .with("fp", TypedValue::void_pointer(regs.regs[29]))
        .with("pc", TypedValue::code_pointer(regs.pc))
        .with("lr", TypedValue::integer(regs.regs[30]))
        .with("cpsr", TypedValue::integer(regs.pstate));

    for (index, value) in regs.regs.iter().enumerate() {
        file.insert(format!("x{index}"), TypedValue::integer(*value));
    }

    Ok(file)
}

/// Register access is only wired up for x86-64 and arm64.
///
/// ## Errors
///
/// - `AttachFailed`: always
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub fn read_registers(pid: Pid) -> Result<RegisterFile>
{
    Err(crate::error::StackloopError::AttachFailed(format!(
        "cannot read registers of {pid}: unsupported architecture {}",
        std::env::consts::ARCH
    )))
}
