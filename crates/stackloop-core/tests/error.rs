//! Error messages as printed by the command line

use stackloop_core::types::Address;
use stackloop_core::StackloopError;

#[test]
fn test_error_display()
{
    let cases = [
        (
            StackloopError::InvalidArgument("not an address".to_string()),
            "Invalid argument: not an address",
        ),
        (
            StackloopError::MultipleOrNoTargets(2),
            "Expected exactly one inferior process, found 2",
        ),
        (
            StackloopError::ByteAlignment {
                length: 83,
                pointer_size: 8,
            },
            "Sample of 83 bytes is not a multiple of the 8-byte pointer size",
        ),
        (StackloopError::ProcessNotFound(4242), "Process not found: PID 4242"),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_memory_access_display()
{
    let error = StackloopError::MemoryAccess {
        address: Address::from(0x7ffd_0000_0000),
        length: 1024,
        reason: "Input/output error".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Cannot access memory at 0x00007ffd00000000 (1024 bytes): Input/output error"
    );
}

#[test]
fn test_expression_display()
{
    let error = StackloopError::Expression {
        expression: "$nope".to_string(),
        reason: "unknown register `$nope`".to_string(),
    };
    assert_eq!(error.to_string(), "Cannot evaluate `$nope`: unknown register `$nope`");
}

#[test]
fn test_io_error_conversion()
{
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "maps");
    let error: StackloopError = io.into();
    assert!(matches!(error, StackloopError::Io(_)));
}
