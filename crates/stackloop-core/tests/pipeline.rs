//! End-to-end runs against an in-memory host

mod common;

use common::{FakeHost, STACK_BASE};
use stackloop_core::config::SampleConfig;
use stackloop_core::debugger::HostContext;
use stackloop_core::decode::AlignmentPolicy;
use stackloop_core::report::NOT_FOUND_MESSAGE;
use stackloop_core::types::{Address, ProcessId};
use stackloop_core::{diagnose, sample_and_detect, StackloopError};

const A: u64 = 0x7f00_dead_0000;
const B: u64 = 0x40_1136;
const C: u64 = 0x40_1242;
const D: u64 = 0x40_1358;

fn recursion_host() -> FakeHost
{
    FakeHost::new()
        .symbol(B, "parse_expr")
        .symbol(C, "parse_term")
        .symbol(D, "parse_atom")
        .words(&[A, B, C, D, B, C, D, B, C, D])
}

fn config(length: usize) -> SampleConfig
{
    SampleConfig::default().with_sample_length(length).unwrap()
}

#[test]
fn test_diagnose_mutual_recursion()
{
    let host = recursion_host();
    let diagnosis = diagnose(&host, None, &config(80)).unwrap();

    assert_eq!(diagnosis.sample.start_address(), Address::from(STACK_BASE));
    assert_eq!(diagnosis.sample.byte_length(), 80);
    assert_eq!(diagnosis.addresses.len(), 10);
    assert_eq!(diagnosis.sequence.len(), 9);
    assert!(diagnosis.is_found());

    let cycle = diagnosis.cycle.as_ref().unwrap();
    assert_eq!(cycle.start_index, 0);
    assert_eq!(cycle.pattern, vec!["parse_expr", "parse_term", "parse_atom"]);

    let report = diagnosis.report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Recurring call pattern starting at frame 0",
            "==========================================",
            "parse_expr @ 0x401136",
            "parse_term @ 0x401242",
            "parse_atom @ 0x401358",
        ]
    );
}

#[test]
fn test_diagnose_with_offset_expression()
{
    // Skip the unresolvable first word
    let host = recursion_host();
    let diagnosis = diagnose(&host, Some("$rsp + 8"), &config(72)).unwrap();
    assert_eq!(diagnosis.sample.start_address(), Address::from(STACK_BASE + 8));
    assert_eq!(diagnosis.addresses[0], Address::from(B));
    assert_eq!(diagnosis.cycle.unwrap().start_index, 0);
}

#[test]
fn test_diagnose_not_found()
{
    let host = FakeHost::new()
        .symbol(B, "main")
        .symbol(C, "run")
        .symbol(D, "work")
        .words(&[B, C, D]);
    let diagnosis = diagnose(&host, None, &config(24)).unwrap();

    assert!(!diagnosis.is_found());
    assert_eq!(diagnosis.report(), NOT_FOUND_MESSAGE);
}

#[test]
fn test_diagnose_nothing_resolves()
{
    let host = FakeHost::new().words(&[A, A + 8, A + 16, 0]);
    let diagnosis = diagnose(&host, None, &config(32)).unwrap();

    assert!(diagnosis.sequence.is_empty());
    assert!(diagnosis.cycle.is_none());
    assert_eq!(diagnosis.symbol_lookups, 4);
}

#[test]
fn test_integer_expression_is_rejected()
{
    let host = recursion_host();
    for expression in ["0x7ffd00000000", "$rax", "$rip"] {
        match diagnose(&host, Some(expression), &config(80)) {
            Err(StackloopError::InvalidArgument(msg)) => assert!(msg.contains("not an address"), "{msg}"),
            other => panic!("Expected InvalidArgument for {expression}, got {other:?}"),
        }
    }
    assert_eq!(host.reads.get(), 0);
}

#[test]
fn test_void_cast_is_accepted()
{
    let host = recursion_host();
    let expression = format!("(void *) {STACK_BASE:#x}");
    let diagnosis = diagnose(&host, Some(&expression), &config(80)).unwrap();
    assert!(diagnosis.is_found());
}

#[test]
fn test_bad_expression()
{
    let host = recursion_host();
    let result = diagnose(&host, Some("$nope"), &config(80));
    assert!(matches!(result, Err(StackloopError::Expression { .. })));
}

#[test]
fn test_target_count_checked_before_reading()
{
    for inferiors in [&[][..], &[1, 2][..]] {
        let host = recursion_host().inferiors(inferiors);
        match diagnose(&host, None, &config(80)) {
            Err(StackloopError::MultipleOrNoTargets(count)) => assert_eq!(count, inferiors.len()),
            other => panic!("Expected MultipleOrNoTargets, got {other:?}"),
        }
        assert_eq!(host.reads.get(), 0);
        assert!(host.queried.borrow().is_empty());
    }
}

#[test]
fn test_unreadable_memory()
{
    let host = recursion_host();
    // Default 1024 bytes is past the end of the fake stack
    match diagnose(&host, None, &SampleConfig::default()) {
        Err(StackloopError::MemoryAccess { address, length, .. }) => {
            assert_eq!(address, Address::from(STACK_BASE));
            assert_eq!(length, 1024);
        }
        other => panic!("Expected MemoryAccess, got {other:?}"),
    }
    assert!(host.queried.borrow().is_empty());
}

#[test]
fn test_partial_pointer_alignment()
{
    let host = recursion_host().words(&[0]);

    let truncated = diagnose(&host, None, &config(83)).unwrap();
    assert_eq!(truncated.sample.byte_length(), 83);
    assert_eq!(truncated.addresses.len(), 10);

    let strict = config(83).with_alignment(AlignmentPolicy::Strict);
    match diagnose(&host, None, &strict) {
        Err(StackloopError::ByteAlignment { length, pointer_size }) => {
            assert_eq!(length, 83);
            assert_eq!(pointer_size, 8);
        }
        other => panic!("Expected ByteAlignment, got {other:?}"),
    }
}

#[test]
fn test_sample_and_detect_with_explicit_context()
{
    let host = recursion_host();
    let context = HostContext::new(&host, &host);
    let diagnosis = sample_and_detect(context, &[ProcessId(1)], Address::from(STACK_BASE), &config(80)).unwrap();
    assert_eq!(diagnosis.cycle.unwrap().pattern.len(), 3);
}

#[test]
fn test_invalid_sample_length()
{
    let host = recursion_host();
    let config = SampleConfig {
        sample_length: 4,
        ..SampleConfig::default()
    };
    assert!(matches!(
        diagnose(&host, None, &config),
        Err(StackloopError::InvalidArgument(_))
    ));
}
