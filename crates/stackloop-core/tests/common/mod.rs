//! In-memory debugger host shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use stackloop_core::debugger::{DebuggerHost, MemoryReader, SymbolLookup};
use stackloop_core::expr::{evaluate, RegisterFile};
use stackloop_core::types::{Address, Architecture, ProcessId, SymbolHit, TypedValue};
use stackloop_core::{Result, StackloopError};

/// Base of the fake stack
pub const STACK_BASE: u64 = 0x7ffd_0000_0000;

/// A stopped process made of a byte buffer and a symbol table
pub struct FakeHost
{
    pub inferiors: Vec<ProcessId>,
    pub stack: Vec<u8>,
    pub symbols: HashMap<u64, SymbolHit>,
    pub registers: RegisterFile,
    pub reads: Cell<usize>,
    pub queried: RefCell<Vec<Address>>,
}

impl FakeHost
{
    pub fn new() -> Self
    {
        Self {
            inferiors: vec![ProcessId(4242)],
            stack: Vec::new(),
            symbols: HashMap::new(),
            registers: RegisterFile::new()
                .with("rsp", TypedValue::void_pointer(STACK_BASE))
                .with("sp", TypedValue::void_pointer(STACK_BASE))
                .with("rip", TypedValue::code_pointer(0x40_1000))
                .with("pc", TypedValue::code_pointer(0x40_1000))
                .with("rax", TypedValue::integer(7)),
            reads: Cell::new(0),
            queried: RefCell::new(Vec::new()),
        }
    }

    /// Map `address` to `name + offset in .text`
    pub fn symbol(mut self, address: u64, name: &str) -> Self
    {
        self.symbols.insert(address, SymbolHit::new(name, address & 0xf, ".text"));
        self
    }

    /// Append little-endian 64-bit words to the stack
    pub fn words(mut self, words: &[u64]) -> Self
    {
        for word in words {
            self.stack.extend_from_slice(&word.to_le_bytes());
        }
        self
    }

    pub fn inferiors(mut self, inferiors: &[u32]) -> Self
    {
        self.inferiors = inferiors.iter().copied().map(ProcessId).collect();
        self
    }

    /// How often `address` was passed to `lookup_symbol`
    pub fn lookups_of(&self, address: u64) -> usize
    {
        self.queried
            .borrow()
            .iter()
            .filter(|queried| queried.value() == address)
            .count()
    }
}

impl MemoryReader for FakeHost
{
    fn read_memory(&self, address: Address, length: usize) -> Result<Vec<u8>>
    {
        self.reads.set(self.reads.get() + 1);

        let fail = |reason: &str| StackloopError::MemoryAccess {
            address,
            length,
            reason: reason.to_string(),
        };
        let offset = address.offset_from(Address::from(STACK_BASE)).ok_or_else(|| fail("below stack"))?;
        let start = usize::try_from(offset).map_err(|_| fail("offset overflow"))?;
        let end = start.checked_add(length).ok_or_else(|| fail("length overflow"))?;

        self.stack
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| fail("Cannot access memory"))
    }
}

impl SymbolLookup for FakeHost
{
    fn lookup_symbol(&self, address: Address) -> Option<SymbolHit>
    {
        self.queried.borrow_mut().push(address);
        self.symbols.get(&address.value()).cloned()
    }
}

impl DebuggerHost for FakeHost
{
    fn current_inferiors(&self) -> Vec<ProcessId>
    {
        self.inferiors.clone()
    }

    fn evaluate_expression(&self, expression: &str) -> Result<TypedValue>
    {
        evaluate(expression, &self.registers)
    }

    fn architecture(&self) -> Architecture
    {
        Architecture::X86_64
    }
}
