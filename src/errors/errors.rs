use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NoPrefixParseFn { .. } => "NoPrefixParseFn",
            ErrorImpl::IntegerParse { .. } => "IntegerParse",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { expected, .. } => match expected {
                TokenKind::RParen | TokenKind::RBrace => {
                    ErrorTip::Suggestion(format!("is a closing `{}` missing?", expected))
                }
                _ => ErrorTip::None,
            },
            ErrorImpl::NoPrefixParseFn { kind } => match kind {
                TokenKind::Illegal => {
                    ErrorTip::Suggestion(String::from("this character is not part of the language"))
                }
                TokenKind::EOF => ErrorTip::Suggestion(String::from("the input ended early")),
                _ => ErrorTip::Suggestion(format!("`{}` cannot start an expression", kind)),
            },
            ErrorImpl::IntegerParse { .. } => ErrorTip::Suggestion(String::from(
                "integers must fit in a signed 64-bit value",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken { expected: TokenKind, got: TokenKind },
    #[error("no prefix parse function for {kind} found")]
    NoPrefixParseFn { kind: TokenKind },
    #[error("could not parse {literal:?} as integer")]
    IntegerParse { literal: String },
}
