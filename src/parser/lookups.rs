use std::collections::HashMap;

use crate::{
    ast::ast::{Expr, Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Binding power of an operator, weakest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Equality and relational
    parser.led(TokenKind::Eq, Precedence::Equals, parse_infix_expr);
    parser.led(TokenKind::NotEq, Precedence::Equals, parse_infix_expr);
    parser.led(TokenKind::Lt, Precedence::LessGreater, parse_infix_expr);
    parser.led(TokenKind::Gt, Precedence::LessGreater, parse_infix_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, Precedence::Sum, parse_infix_expr);
    parser.led(TokenKind::Minus, Precedence::Sum, parse_infix_expr);
    parser.led(TokenKind::Asterisk, Precedence::Product, parse_infix_expr);
    parser.led(TokenKind::Slash, Precedence::Product, parse_infix_expr);

    parser.led(TokenKind::LParen, Precedence::Call, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Ident, parse_identifier);
    parser.nud(TokenKind::Int, parse_integer_literal);
    parser.nud(TokenKind::True, parse_boolean);
    parser.nud(TokenKind::False, parse_boolean);
    parser.nud(TokenKind::Bang, parse_prefix_expr);
    parser.nud(TokenKind::Minus, parse_prefix_expr);
    parser.nud(TokenKind::LParen, parse_grouping_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::Function, parse_function_literal);

    // Statements
    parser.stmt(TokenKind::Let, parse_let_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type PrecedenceLookup = HashMap<TokenKind, Precedence>;
