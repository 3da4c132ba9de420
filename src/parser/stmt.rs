use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::Identifier,
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::Precedence},
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::Ident)?;
    let name = Identifier {
        token: parser.current_token().clone(),
        value: parser.current_token().value.clone(),
    };

    parser.expect_peek(TokenKind::Assign)?;
    parser.next_token();

    let value = parse_expr(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(Stmt::Let(LetStmt {
        span: Span {
            start: token.span.start.clone(),
            end: parser.current_token().span.end.clone(),
        },
        token,
        name,
        value,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();
    parser.next_token();

    let value = parse_expr(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(Stmt::Return(ReturnStmt {
        span: Span {
            start: token.span.start.clone(),
            end: parser.current_token().span.end.clone(),
        },
        token,
        value,
    }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();

    let expression: Expr = parse_expr(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(Stmt::Expression(ExpressionStmt {
        span: Span {
            start: token.span.start.clone(),
            end: parser.current_token().span.end.clone(),
        },
        token,
        expression,
    }))
}

/// Parses `{ ... }` with `current` on the opening brace, leaving `current`
/// on the closing one.
///
/// A statement that fails inside the block is recorded and skipped, so one
/// mistake does not throw away the rest of the block. Running into `EOF`
/// before the closing brace is an error for the block as a whole.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let token = parser.current_token().clone();
    parser.next_token();

    let mut statements = Vec::new();
    while !parser.current_is(TokenKind::RBrace) && !parser.current_is(TokenKind::EOF) {
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                parser.record_error(error);
                // Failed on this block's own closing brace
                if parser.current_is(TokenKind::RBrace) {
                    continue;
                }
                parser.synchronize();
            }
        }

        parser.next_token();
    }

    if parser.current_is(TokenKind::EOF) {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::RBrace,
                got: TokenKind::EOF,
            },
            parser.get_position(),
        ));
    }

    Ok(BlockStmt {
        span: Span {
            start: token.span.start.clone(),
            end: parser.current_token().span.end.clone(),
        },
        token,
        statements,
    })
}

/// Semicolons terminate statements but are optional before `}` and `EOF`.
fn skip_semicolon(parser: &mut Parser) {
    if parser.peek_is(TokenKind::Semicolon) {
        parser.next_token();
    }
}
