//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that turns the lexer's token stream
//! into a `Program`. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Statement parsing (`let`, `return`, expression statements, blocks)
//! - Expression parsing (prefix and infix operators, grouping, `if`,
//!   function literals, calls)
//! - Error recording and recovery, so one bad statement does not hide the rest
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with a precedence table deciding how far each
//! infix operator extends.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
