use std::fmt::{self, Display};

use crate::{ensure_stack, Position, Span};

use super::{
    expressions::{
        BooleanLiteral, CallExpr, FunctionLiteral, Identifier, IfExpr, InfixExpr, IntegerLiteral,
        PrefixExpr,
    },
    statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
};

/// Node Trait
///
/// Shared behaviour of every AST node. Rendering back to source text is the
/// node's `Display` implementation.
pub trait Node: Display {
    /// Literal text of the first token the node was built from.
    fn token_literal(&self) -> &str;
    /// Source span covered by the node.
    fn span(&self) -> Span;
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
    Block(BlockStmt),
}

impl Node for Stmt {
    fn token_literal(&self) -> &str {
        match self {
            Stmt::Let(stmt) => stmt.token_literal(),
            Stmt::Return(stmt) => stmt.token_literal(),
            Stmt::Expression(stmt) => stmt.token_literal(),
            Stmt::Block(stmt) => stmt.token_literal(),
        }
    }
    fn span(&self) -> Span {
        match self {
            Stmt::Let(stmt) => stmt.span(),
            Stmt::Return(stmt) => stmt.span(),
            Stmt::Expression(stmt) => stmt.span(),
            Stmt::Block(stmt) => stmt.span(),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(stmt) => stmt.fmt(f),
            Stmt::Return(stmt) => stmt.fmt(f),
            Stmt::Expression(stmt) => stmt.fmt(f),
            Stmt::Block(stmt) => stmt.fmt(f),
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(FunctionLiteral),
    Call(CallExpr),
}

impl Node for Expr {
    fn token_literal(&self) -> &str {
        match self {
            Expr::Identifier(expr) => expr.token_literal(),
            Expr::Integer(expr) => expr.token_literal(),
            Expr::Boolean(expr) => expr.token_literal(),
            Expr::Prefix(expr) => expr.token_literal(),
            Expr::Infix(expr) => expr.token_literal(),
            Expr::If(expr) => expr.token_literal(),
            Expr::Function(expr) => expr.token_literal(),
            Expr::Call(expr) => expr.token_literal(),
        }
    }
    fn span(&self) -> Span {
        ensure_stack(|| match self {
            Expr::Identifier(expr) => expr.span(),
            Expr::Integer(expr) => expr.span(),
            Expr::Boolean(expr) => expr.span(),
            Expr::Prefix(expr) => expr.span(),
            Expr::Infix(expr) => expr.span(),
            Expr::If(expr) => expr.span(),
            Expr::Function(expr) => expr.span(),
            Expr::Call(expr) => expr.span(),
        })
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_stack(|| match self {
            Expr::Identifier(expr) => expr.fmt(f),
            Expr::Integer(expr) => expr.fmt(f),
            Expr::Boolean(expr) => expr.fmt(f),
            Expr::Prefix(expr) => expr.fmt(f),
            Expr::Infix(expr) => expr.fmt(f),
            Expr::If(expr) => expr.fmt(f),
            Expr::Function(expr) => expr.fmt(f),
            Expr::Call(expr) => expr.fmt(f),
        })
    }
}

/// Program
///
/// Root of a parse. Renders as its statements concatenated with no separator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or("")
    }
    fn span(&self) -> Span {
        match (self.statements.first(), self.statements.last()) {
            (Some(first), Some(last)) => Span {
                start: first.span().start,
                end: last.span().end,
            },
            _ => Span {
                start: Position::null(),
                end: Position::null(),
            },
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
