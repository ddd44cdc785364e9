//! Attach to a real child process
//!
//! ptrace may be restricted (`kernel.yama.ptrace_scope`, containers without
//! `CAP_SYS_PTRACE`); these tests skip in that case instead of failing.

#![cfg(target_os = "linux")]

use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use stackloop_core::config::SampleConfig;
use stackloop_core::platform::linux::PtraceHost;
use stackloop_core::types::{Address, ProcessId, ValueType};
use stackloop_core::{diagnose, DebuggerHost, MemoryReader, StackloopError};

struct Sleeper(Child);

impl Sleeper
{
    fn spawn() -> Self
    {
        let child = Command::new("sleep").arg("30").spawn().expect("failed to spawn sleep");
        // Give the child time to exec
        thread::sleep(Duration::from_millis(100));
        Self(child)
    }

    fn pid(&self) -> ProcessId
    {
        ProcessId::from(self.0.id())
    }
}

impl Drop for Sleeper
{
    fn drop(&mut self)
    {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn attach_or_skip(pid: ProcessId) -> Option<PtraceHost>
{
    match PtraceHost::attach(pid) {
        Ok(host) => Some(host),
        Err(StackloopError::PermissionDenied(msg)) => {
            eprintln!("Skipping: {msg}");
            None
        }
        Err(StackloopError::Io(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("Skipping: {e}");
            None
        }
        Err(e) => panic!("Failed to attach to {pid}: {e}"),
    }
}

#[test]
fn test_attach_reads_registers_and_stack()
{
    let sleeper = Sleeper::spawn();
    let Some(host) = attach_or_skip(sleeper.pid()) else {
        return;
    };

    assert_eq!(host.current_inferiors(), vec![sleeper.pid()]);

    let expression = host.architecture().default_stack_expression();
    let sp = host.evaluate_expression(expression).unwrap();
    assert_eq!(sp.ty, ValueType::VoidPointer);

    let bytes = host.read_memory(Address::from(sp.value), 64).unwrap();
    assert_eq!(bytes.len(), 64);

    assert!(!host.images().unwrap().mappings().is_empty());
    host.detach().unwrap();
}

#[test]
fn test_diagnose_live_process()
{
    let sleeper = Sleeper::spawn();
    let Some(host) = attach_or_skip(sleeper.pid()) else {
        return;
    };

    // A sleeping process has no recursion; either outcome is a valid report
    let config = SampleConfig::for_architecture(host.architecture())
        .with_sample_length(256)
        .unwrap();
    let diagnosis = diagnose(&host, None, &config).unwrap();
    assert_eq!(diagnosis.addresses.len(), 32);
    assert!(!diagnosis.report().is_empty());
}

#[test]
fn test_unmapped_read_fails()
{
    let sleeper = Sleeper::spawn();
    let Some(host) = attach_or_skip(sleeper.pid()) else {
        return;
    };

    match host.read_memory(Address::from(8), 16) {
        Err(StackloopError::MemoryAccess { address, length, .. }) => {
            assert_eq!(address, Address::from(8));
            assert_eq!(length, 16);
        }
        other => panic!("Expected MemoryAccess, got {other:?}"),
    }
}
