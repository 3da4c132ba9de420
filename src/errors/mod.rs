//! Error types for the front end.
//!
//! Lexing never fails: unknown characters become `Illegal` tokens. Parse
//! errors are values, collected by the parser in source order:
//!
//! - Error structures with source position information
//! - One variant per failure class (unexpected token, no prefix handler,
//!   unparseable integer)
//! - Short suggestions shown by the driver

pub mod errors;
