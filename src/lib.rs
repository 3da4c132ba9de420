#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

pub use lexer::lexer::tokenize;
pub use parser::parser::parse;

extern crate regex;

/// Byte offset into a source, tagged with the source's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    /// Offsets past `u32::MAX` saturate.
    pub fn new(offset: usize, file: Rc<String>) -> Self {
        Position(u32::try_from(offset).unwrap_or(u32::MAX), file)
    }

    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

// Grow the stack on the heap when less than 64 KiB remains, 1 MiB at a time
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// Runs `f` with enough stack for one more level of tree recursion.
///
/// Parsing, rendering and span computation recurse once per nesting level
/// of the input, so every recursive entry point goes through here.
pub(crate) fn ensure_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// Finds the line containing `position` in `source`.
///
/// Returns the 1-based line number, the line's text and the offset of
/// `position` within that line. A position at the very end of the input
/// (where `EOF` lives) resolves to the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character of the final line
    match source.split_inclusive('\n').last() {
        Some(line) if !line.ends_with('\n') => Some((line_number - 1, line.to_string(), line.len())),
        _ => Some((line_number, String::new(), 0)),
    }
}
