//! Lexical analysis for the front end.
//!
//! This module contains the lexer (tokenizer) that turns source text into
//! tokens on demand. It handles:
//!
//! - Pull-based scanning, one token per call, `EOF` forever after the end
//! - Recognition of keywords, identifiers, integer literals and operators
//! - Byte spans on every token for error reporting
//! - Unknown characters, surfaced as `Illegal` tokens rather than errors

pub mod lexer;
pub mod tokens;
