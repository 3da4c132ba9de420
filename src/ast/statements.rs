use std::{
    fmt::{self, Display},
    slice::Iter,
};

use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{Expr, Node, Stmt},
    expressions::Identifier,
};

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub token: Token,
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

impl Node for LetStmt {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for LetStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {};", self.token_literal(), self.name, self.value)
    }
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub token: Token,
    pub value: Expr,
    pub span: Span,
}

impl Node for ReturnStmt {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ReturnStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.token_literal(), self.value)
    }
}

/// A bare expression used as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub token: Token,
    pub expression: Expr,
    pub span: Span,
}

impl Node for ExpressionStmt {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.span.clone()
    }
}

// The trailing semicolon keeps consecutive statements apart when a
// program is rendered and parsed again.
impl Display for ExpressionStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.expression)
    }
}

/// `{ <statements> }`, the body of `if` branches and function literals.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub token: Token,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }
}

impl Node for BlockStmt {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for stmt in self.iter() {
            write!(f, "{} ", stmt)?;
        }
        write!(f, "}}")
    }
}
