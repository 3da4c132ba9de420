//! Parser state and the program-level entry points.
//!
//! The parser pulls tokens from a [`Lexer`] through a two-token window
//! (`current` and `peek`) and never looks further ahead. It owns the
//! lookup tables filled by `create_token_lookups`:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Operator precedences
//!
//! Errors do not stop a parse. Each failed statement leaves one entry in the
//! error list and parsing resumes after it.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{
        create_token_lookups, LEDHandler, LEDLookup, NUDHandler, NUDLookup, Precedence,
        PrecedenceLookup, StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Source of tokens, pulled one at a time
    lexer: Lexer,
    /// Token under examination
    current: Token,
    /// One token of lookahead
    peek: Token,
    /// Errors recorded so far, in source order
    errors: Vec<Error>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for operator precedences
    precedence_lookup: PrecedenceLookup,
}

impl Parser {
    /// Creates a parser over `lexer` with `current` and `peek` filled and
    /// all handlers registered.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            peek,
            errors: vec![],
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            precedence_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);

        parser
    }

    /// Parses statements until `EOF`.
    ///
    /// Always returns a program. Statements that fail to parse are left
    /// out; the reason is recorded in [`Parser::errors`], which callers must
    /// check before using the program.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_is(TokenKind::EOF) {
            match parse_stmt(self) {
                Ok(stmt) => program.statements.push(stmt),
                Err(error) => {
                    self.record_error(error);
                    self.synchronize();
                }
            }

            self.next_token();
        }

        program
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns the lookahead token.
    pub fn peek_token(&self) -> &Token {
        &self.peek
    }

    /// Returns the kind of the lookahead token.
    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Shifts the window one token forward.
    pub fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances onto the lookahead token if it has the expected kind.
    ///
    /// # Returns
    ///
    /// Returns an `UnexpectedToken` error positioned at the lookahead token
    /// otherwise, leaving the window untouched.
    pub fn expect_peek(&mut self, expected: TokenKind) -> Result<(), Error> {
        if self.peek_is(expected) {
            self.next_token();
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected,
                    got: self.peek.kind,
                },
                self.peek.span.start.clone(),
            ))
        }
    }

    /// Precedence of the lookahead token, `Lowest` if it is not an operator.
    pub fn peek_precedence(&self) -> Precedence {
        self.precedence_of(self.peek.kind)
    }

    /// Precedence of the current token, `Lowest` if it is not an operator.
    pub fn current_precedence(&self) -> Precedence {
        self.precedence_of(self.current.kind)
    }

    fn precedence_of(&self, kind: TokenKind) -> Precedence {
        *self
            .precedence_lookup
            .get(&kind)
            .unwrap_or(&Precedence::Lowest)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `precedence` - The binding power of this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, precedence: Precedence, led_fn: LEDHandler) {
        self.precedence_lookup.insert(kind, precedence);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    pub fn record_error(&mut self, error: Error) {
        debug!(error = %error, offset = error.get_position().0, "parse error");
        self.errors.push(error);
    }

    /// Skips the rest of a statement that failed to parse.
    ///
    /// Stops with `current` on the statement's `;`, just before a `}` that
    /// closes an enclosing block, or at `EOF`. Braces opened inside the
    /// skipped tokens are matched so a broken block is skipped whole, and
    /// the statement is taken to end with that block's `}`.
    ///
    /// Blocks handle a failure on their own `}` themselves, so a `}` under
    /// `current` here is a stray one with no block to close. It ends the
    /// statement together with a `;` right after it.
    pub fn synchronize(&mut self) {
        match self.current.kind {
            TokenKind::Semicolon | TokenKind::EOF => return,
            TokenKind::RBrace => {
                if self.peek_is(TokenKind::Semicolon) {
                    self.next_token();
                }
                return;
            }
            _ => {}
        }

        let mut depth = if self.current_is(TokenKind::LBrace) { 1 } else { 0 };

        loop {
            match self.peek.kind {
                TokenKind::EOF => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.next_token();
                    break;
                }
                TokenKind::RBrace if depth == 0 => break,
                TokenKind::RBrace => {
                    depth -= 1;
                    // A skipped block ends the statement unless `;` follows
                    if depth == 0 {
                        self.next_token();
                        if self.peek_is(TokenKind::Semicolon) {
                            self.next_token();
                        }
                        break;
                    }
                }
                TokenKind::LBrace => depth += 1,
                _ => {}
            }

            self.next_token();
        }

        trace!(resumed_after = %self.current, "synchronized");
    }
}

/// Parses a source text into a program.
///
/// This is the main entry point for parsing: it builds a lexer and parser
/// for `source` and parses every statement until `EOF`.
///
/// # Returns
///
/// The program, always, and the errors recorded while parsing it. A
/// non-empty error list means the program must not be evaluated.
pub fn parse(source: &str, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(Lexer::new(source, file));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
