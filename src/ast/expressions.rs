use std::fmt::{self, Display};

use crate::{
    ensure_stack,
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    ast::{Expr, Node},
    statements::BlockStmt,
};

// LITERALS

/// Identifier
/// A name reference. Also used for `let` targets and function parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.token.span.clone()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Integer Literal
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl Node for IntegerLiteral {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.token.span.clone()
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Boolean Literal
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

impl Node for BooleanLiteral {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.token.span.clone()
    }
}

impl Display for BooleanLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// COMPLEX

/// Prefix Expression
/// A unary operator (`!` or `-`) applied to its operand.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expr>,
}

impl Node for PrefixExpr {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        Span {
            start: self.token.span.start.clone(),
            end: self.right.span().end,
        }
    }
}

impl Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// Infix Expression
/// A binary operation. The token is the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub token: Token,
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl Node for InfixExpr {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        Span {
            start: self.left.span().start,
            end: self.right.span().end,
        }
    }
}

impl Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

/// Stand-in left in a child slot while the real child is dropped.
fn hollow(span: &Span) -> Expr {
    Expr::Boolean(BooleanLiteral {
        token: Token {
            kind: TokenKind::False,
            value: String::new(),
            span: span.clone(),
        },
        value: false,
    })
}

// Operator chains nest as deep as the input, so their children are torn
// down through `ensure_stack`
impl Drop for PrefixExpr {
    fn drop(&mut self) {
        let right = std::mem::replace(self.right.as_mut(), hollow(&self.token.span));
        ensure_stack(|| drop(right));
    }
}

impl Drop for InfixExpr {
    fn drop(&mut self) {
        let left = std::mem::replace(self.left.as_mut(), hollow(&self.token.span));
        let right = std::mem::replace(self.right.as_mut(), hollow(&self.token.span));
        ensure_stack(|| drop((left, right)));
    }
}

/// If Expression
/// `if (<condition>) { ... }` with an optional `else { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub token: Token,
    pub condition: Box<Expr>,
    pub consequence: BlockStmt,
    pub alternative: Option<BlockStmt>,
}

impl Node for IfExpr {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        let last = self.alternative.as_ref().unwrap_or(&self.consequence);
        Span {
            start: self.token.span.start.clone(),
            end: last.span.end.clone(),
        }
    }
}

impl Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

/// Function Literal
/// `fn(<parameters>) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStmt,
}

impl Node for FunctionLiteral {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        Span {
            start: self.token.span.start.clone(),
            end: self.body.span.end.clone(),
        }
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{}({}) {}", self.token_literal(), parameters, self.body)
    }
}

/// Call Expression
/// The token is the opening parenthesis; the span runs from the callee to
/// the closing one.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub token: Token,
    pub function: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl Node for CallExpr {
    fn token_literal(&self) -> &str {
        &self.token.value
    }
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments = self
            .arguments
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{}({})", self.function, arguments)
    }
}
