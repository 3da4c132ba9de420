use crate::{
    ast::{
        ast::{Expr, Node},
        expressions::{
            BooleanLiteral, CallExpr, FunctionLiteral, Identifier, IfExpr, InfixExpr,
            IntegerLiteral, PrefixExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    ensure_stack,
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::Precedence, parser::Parser, stmt::parse_block_stmt};

/// Pratt expression parser.
///
/// Starts with `current` on the first token of the expression and leaves
/// `current` on its last token. Every nested construct re-enters here, so
/// the stack is grown on the heap before it runs out.
pub fn parse_expr(parser: &mut Parser, precedence: Precedence) -> Result<Expr, Error> {
    ensure_stack(|| parse_expr_with(parser, precedence))
}

fn parse_expr_with(parser: &mut Parser, precedence: Precedence) -> Result<Expr, Error> {
    // First parse NUD
    let kind = parser.current_token_kind();
    let Some(prefix) = parser.get_nud_lookup().get(&kind).copied() else {
        return Err(Error::new(
            ErrorImpl::NoPrefixParseFn { kind },
            parser.get_position(),
        ));
    };

    let mut left = prefix(parser)?;

    // While the next operator binds tighter than the caller, let it take `left`
    while !parser.peek_is(TokenKind::Semicolon) && precedence < parser.peek_precedence() {
        let Some(infix) = parser
            .get_led_lookup()
            .get(&parser.peek_token_kind())
            .copied()
        else {
            return Ok(left);
        };

        parser.next_token();
        left = infix(parser, left)?;
    }

    Ok(left)
}

pub fn parse_identifier(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    Ok(Expr::Identifier(Identifier {
        value: token.value.clone(),
        token,
    }))
}

pub fn parse_integer_literal(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.value.parse::<i64>() {
        Ok(value) => Ok(Expr::Integer(IntegerLiteral { token, value })),
        Err(_) => Err(Error::new(
            ErrorImpl::IntegerParse {
                literal: token.value,
            },
            token.span.start,
        )),
    }
}

pub fn parse_boolean(parser: &mut Parser) -> Result<Expr, Error> {
    Ok(Expr::Boolean(BooleanLiteral {
        token: parser.current_token().clone(),
        value: parser.current_is(TokenKind::True),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();
    parser.next_token();

    let right = parse_expr(parser, Precedence::Prefix)?;

    Ok(Expr::Prefix(PrefixExpr {
        operator: token.value.clone(),
        token,
        right: Box::new(right),
    }))
}

/// Right operand binds at the operator's own precedence, so chains of the
/// same operator group to the left.
pub fn parse_infix_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    let token = parser.current_token().clone();
    let precedence = parser.current_precedence();
    parser.next_token();

    let right = parse_expr(parser, precedence)?;

    Ok(Expr::Infix(InfixExpr {
        operator: token.value.clone(),
        token,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.next_token();

    let expr = parse_expr(parser, Precedence::Lowest)?;
    parser.expect_peek(TokenKind::RParen)?;

    Ok(expr)
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    // if (<condition>) { ... } else { ... }
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::LParen)?;
    parser.next_token();
    let condition = parse_expr(parser, Precedence::Lowest)?;
    parser.expect_peek(TokenKind::RParen)?;

    parser.expect_peek(TokenKind::LBrace)?;
    let consequence = parse_block_stmt(parser)?;

    let alternative = if parser.peek_is(TokenKind::Else) {
        parser.next_token();
        parser.expect_peek(TokenKind::LBrace)?;
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Ok(Expr::If(IfExpr {
        token,
        condition: Box::new(condition),
        consequence,
        alternative,
    }))
}

pub fn parse_function_literal(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::LParen)?;
    let parameters = parse_list(parser, TokenKind::RParen, parse_parameter)?;

    parser.expect_peek(TokenKind::LBrace)?;
    let body = parse_block_stmt(parser)?;

    Ok(Expr::Function(FunctionLiteral {
        token,
        parameters,
        body,
    }))
}

pub fn parse_call_expr(parser: &mut Parser, function: Expr) -> Result<Expr, Error> {
    let token = parser.current_token().clone();
    let arguments = parse_list(parser, TokenKind::RParen, parse_argument)?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: function.span().start,
            end: parser.current_token().span.end.clone(),
        },
        token,
        function: Box::new(function),
        arguments,
    }))
}

/// Parses `item (, item)*` up to `end`, starting with `current` on the
/// opening delimiter and leaving it on `end`.
fn parse_list<T>(
    parser: &mut Parser,
    end: TokenKind,
    parse_item: fn(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = vec![];

    if parser.peek_is(end) {
        parser.next_token();
        return Ok(items);
    }

    parser.next_token();
    items.push(parse_item(parser)?);

    while parser.peek_is(TokenKind::Comma) {
        parser.next_token();
        parser.next_token();
        items.push(parse_item(parser)?);
    }

    parser.expect_peek(end)?;

    Ok(items)
}

fn parse_parameter(parser: &mut Parser) -> Result<Identifier, Error> {
    let token = parser.current_token().clone();

    if token.kind != TokenKind::Ident {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::Ident,
                got: token.kind,
            },
            token.span.start,
        ));
    }

    Ok(Identifier {
        value: token.value.clone(),
        token,
    })
}

fn parse_argument(parser: &mut Parser) -> Result<Expr, Error> {
    parse_expr(parser, Precedence::Lowest)
}
