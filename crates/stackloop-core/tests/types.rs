//! Tests for platform-agnostic types

use stackloop_core::types::{
    Address, Architecture, MemoryRegion, ProcessId, StackSample, SymbolHit, TypedValue, ValueType,
};

#[test]
fn test_process_id_conversions()
{
    let pid = ProcessId::from(12345);
    assert_eq!(pid.0, 12345);
    assert_eq!(u32::from(pid), 12345);
    assert_eq!(pid.to_string(), "12345");
    assert_ne!(pid, ProcessId::from(54321));
}

#[test]
fn test_address_formatting()
{
    let address = Address::from(0x40_1136);
    assert_eq!(address.to_string(), "0x0000000000401136");
    assert_eq!(format!("{address:#x}"), "0x401136");
    assert_eq!(u64::from(address + 8), 0x40_113e);
    assert_eq!(Address::new(0x10).offset_from(Address::new(0x20)), None);
    assert_eq!(Address::new(u64::MAX).checked_add(1), None);
}

#[test]
fn test_memory_region()
{
    let stack = MemoryRegion::new(
        Address::from(0x7ffd_0000),
        Address::from(0x7ffd_2000),
        "rw-p".to_string(),
        0,
        Some("[stack]".into()),
    );

    assert_eq!(stack.size(), 0x2000);
    assert!(stack.is_readable());
    assert!(!stack.is_executable());
    assert!(!stack.is_file_backed());
    assert!(stack.contains(Address::from(0x7ffd_1fff)));
    assert!(!stack.contains(Address::from(0x7ffd_2000)));
}

#[test]
fn test_architecture_defaults()
{
    assert_eq!(Architecture::X86_64.pointer_size_bytes(), 8);
    assert_eq!(Architecture::X86_64.default_stack_expression(), "$rsp");
    assert_eq!(Architecture::Arm64.default_stack_expression(), "$sp");
    assert!(Architecture::Arm64.is_little_endian());
    assert_eq!(Architecture::X86_64.to_string(), "x86_64");
}

#[test]
fn test_typed_values()
{
    assert_eq!(TypedValue::void_pointer(0x1000).as_void_pointer(), Some(Address::from(0x1000)));
    assert_eq!(TypedValue::code_pointer(0x1000).as_void_pointer(), None);
    assert_eq!(TypedValue::integer(0x1000).as_void_pointer(), None);
    assert_eq!(ValueType::VoidPointer.to_string(), "void *");
}

#[test]
fn test_stack_sample()
{
    let sample = StackSample::new(Address::from(0x1000), vec![0; 24]);
    assert_eq!(sample.byte_length(), 24);
    assert_eq!(sample.end_address(), Address::from(0x1018));
}

#[test]
fn test_symbol_hit_display()
{
    let hit = SymbolHit::new("walk", 23, ".text");
    assert_eq!(hit.to_string(), "walk + 23 in section .text");
}
