//! # Start Address Expressions
//!
//! A deliberately small subset of debugger expression syntax, enough to say
//! where on the stack to start sampling:
//!
//! ```text
//! $rsp
//! $sp + 0x28
//! ($rbp - 16)
//! (void *) 0x7ffc0000
//! ```
//!
//! Values carry a [`ValueType`]. Pointer arithmetic keeps the pointer type,
//! the difference of two pointers is an integer, and `(void *)` casts anything
//! to a data pointer. The pipeline only accepts a `void *` result.

use std::collections::HashMap;

use crate::error::{Result, StackloopError};
use crate::types::{TypedValue, ValueType};

/// Named register values available to `$name` references
#[derive(Debug, Clone, Default)]
pub struct RegisterFile
{
    registers: HashMap<String, TypedValue>,
}

impl RegisterFile
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue)
    {
        self.registers.insert(name.into(), value);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: TypedValue) -> Self
    {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<TypedValue>
    {
        self.registers.get(name).copied()
    }

    pub fn len(&self) -> usize
    {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.registers.is_empty()
    }
}

/// Evaluate `expression` against `registers`
///
/// ```rust
/// use stackloop_core::expr::{evaluate, RegisterFile};
/// use stackloop_core::types::{TypedValue, ValueType};
///
/// let registers = RegisterFile::new().with("rsp", TypedValue::void_pointer(0x7ffd_0000));
/// let value = evaluate("$rsp + 0x28", &registers)?;
/// assert_eq!(value, TypedValue::void_pointer(0x7ffd_0028));
///
/// assert_eq!(evaluate("0x1000", &registers)?.ty, ValueType::Integer);
/// # Ok::<(), stackloop_core::StackloopError>(())
/// ```
///
/// ## Errors
///
/// - `Expression`: syntax errors, unknown registers, invalid operand types
pub fn evaluate(expression: &str, registers: &RegisterFile) -> Result<TypedValue>
{
    let fail = |reason: String| StackloopError::Expression {
        expression: expression.to_string(),
        reason,
    };

    let tokens = tokenize(expression).map_err(fail)?;
    let mut parser = Parser {
        tokens: &tokens,
        position: 0,
        registers,
    };

    let value = parser.expression().map_err(fail)?;
    if let Some(token) = parser.peek() {
        return Err(fail(format!("unexpected {token}")));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token
{
    Number(u64),
    Register(String),
    Word(String),
    Plus,
    Minus,
    Star,
    Open,
    Close,
}

impl std::fmt::Display for Token
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self {
            Token::Number(value) => write!(f, "number {value}"),
            Token::Register(name) => write!(f, "register ${name}"),
            Token::Word(word) => write!(f, "`{word}`"),
            Token::Plus => write!(f, "`+`"),
            Token::Minus => write!(f, "`-`"),
            Token::Star => write!(f, "`*`"),
            Token::Open => write!(f, "`(`"),
            Token::Close => write!(f, "`)`"),
        }
    }
}

fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String>
{
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '(' => Token::Open,
                    _ => Token::Close,
                });
            }
            '$' => {
                chars.next();
                let name = take_word(input, &mut chars);
                if name.is_empty() {
                    return Err("expected register name after `$`".to_string());
                }
                tokens.push(Token::Register(name.to_string()));
            }
            c if c.is_ascii_digit() => {
                let literal = take_word(input, &mut chars);
                tokens.push(Token::Number(parse_number(literal)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                tokens.push(Token::Word(take_word(input, &mut chars).to_string()));
            }
            other => return Err(format!("unexpected character `{other}` at {start}")),
        }
    }

    Ok(tokens)
}

fn take_word<'a>(input: &'a str, chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> &'a str
{
    let start = chars.peek().map_or(input.len(), |&(index, _)| index);
    let mut end = start;
    while let Some(&(index, c)) = chars.peek() {
        if !(c.is_alphanumeric() || c == '_') {
            break;
        }
        end = index + c.len_utf8();
        chars.next();
    }
    &input[start..end]
}

fn parse_number(literal: &str) -> std::result::Result<u64, String>
{
    let parsed = if let Some(hex) = literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        literal.parse()
    };
    parsed.map_err(|err| format!("invalid number `{literal}`: {err}"))
}

struct Parser<'a>
{
    tokens: &'a [Token],
    position: usize,
    registers: &'a RegisterFile,
}

impl Parser<'_>
{
    fn peek(&self) -> Option<&Token>
    {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&Token>
    {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    fn expect(&mut self, wanted: &Token) -> std::result::Result<(), String>
    {
        match self.advance() {
            Some(token) if token == wanted => Ok(()),
            Some(token) => Err(format!("expected {wanted}, found {token}")),
            None => Err(format!("expected {wanted}, found end of expression")),
        }
    }

    /// expression := unary (("+" | "-") unary)*
    fn expression(&mut self) -> std::result::Result<TypedValue, String>
    {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.position += 1;
                    let rhs = self.unary()?;
                    value = add(value, rhs)?;
                }
                Some(Token::Minus) => {
                    self.position += 1;
                    let rhs = self.unary()?;
                    value = subtract(value, rhs)?;
                }
                _ => return Ok(value),
            }
        }
    }

    /// unary := "-" unary | "(" "void" "*" ")" unary | primary
    fn unary(&mut self) -> std::result::Result<TypedValue, String>
    {
        if self.peek() == Some(&Token::Minus) {
            self.position += 1;
            let operand = self.unary()?;
            return match operand.ty {
                ValueType::Integer => Ok(TypedValue::integer(operand.value.wrapping_neg())),
                ValueType::VoidPointer | ValueType::CodePointer => {
                    Err(format!("cannot negate a value of type `{}`", operand.ty))
                }
            };
        }

        if self.is_void_cast() {
            self.position += 4;
            let operand = self.unary()?;
            return Ok(TypedValue::void_pointer(operand.value));
        }

        self.primary()
    }

    fn is_void_cast(&self) -> bool
    {
        matches!(
            self.tokens.get(self.position..self.position + 4),
            Some([Token::Open, Token::Word(word), Token::Star, Token::Close]) if word == "void"
        )
    }

    /// primary := number | "$" register | "(" expression ")"
    fn primary(&mut self) -> std::result::Result<TypedValue, String>
    {
        match self.advance().cloned() {
            Some(Token::Number(value)) => Ok(TypedValue::integer(value)),
            Some(Token::Register(name)) => self
                .registers
                .get(&name)
                .ok_or_else(|| format!("unknown register `${name}`")),
            Some(Token::Open) => {
                let value = self.expression()?;
                self.expect(&Token::Close)?;
                Ok(value)
            }
            Some(token) => Err(format!("unexpected {token}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

fn add(lhs: TypedValue, rhs: TypedValue) -> std::result::Result<TypedValue, String>
{
    let value = lhs.value.wrapping_add(rhs.value);
    match (lhs.ty, rhs.ty) {
        (ValueType::Integer, ValueType::Integer) => Ok(TypedValue::integer(value)),
        (pointer, ValueType::Integer) | (ValueType::Integer, pointer) => Ok(TypedValue { value, ty: pointer }),
        (left, right) => Err(format!("cannot add `{left}` and `{right}`")),
    }
}

fn subtract(lhs: TypedValue, rhs: TypedValue) -> std::result::Result<TypedValue, String>
{
    let value = lhs.value.wrapping_sub(rhs.value);
    match (lhs.ty, rhs.ty) {
        (ValueType::Integer, ValueType::Integer) => Ok(TypedValue::integer(value)),
        (pointer, ValueType::Integer) => Ok(TypedValue { value, ty: pointer }),
        (left, right) if left == right => Ok(TypedValue::integer(value)),
        (left, right) => Err(format!("cannot subtract `{right}` from `{left}`")),
    }
}
