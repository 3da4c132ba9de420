use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{lookup_ident, Token, TokenKind};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Token;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new("^[ \t\n\r]+").unwrap();

    // Two-character operators come before their one-character prefixes
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_]+").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Eq, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEq, "!=") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assign, "=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Bang, "!") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Asterisk, "*") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Lt, "<") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Gt, ">") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RParen, ")") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LBrace, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RBrace, "}") },
    ];
}

/// Pull-based tokenizer over an in-memory source.
///
/// Each call to [`Lexer::next_token`] scans exactly one token and moves the
/// cursor past it. Once the input is exhausted every further call returns
/// `EOF`. A lexer only ever moves forward; to re-scan, build a new one.
pub struct Lexer {
    source: String,
    pos: usize,
    file: Rc<String>,
    emitted_eof: bool,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source: source.to_string(),
            pos: 0,
            file: file_name,
            emitted_eof: false,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(ch) = self.remainder().chars().next() else {
            return MK_TOKEN!(TokenKind::EOF, String::new(), self.span_of(0));
        };

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(self.remainder()) {
                let token = (pattern.handler)(self, &pattern.regex);
                trace!(kind = %token.kind, value = %token.value, "scanned token");
                return token;
            }
        }

        debug!(character = %ch, offset = self.pos, "illegal character");
        let token = MK_TOKEN!(TokenKind::Illegal, ch.to_string(), self.span_of(ch.len_utf8()));
        self.advance_n(ch.len_utf8());
        token
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    /// Span covering the next `len` bytes from the cursor.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position::new(self.pos, Rc::clone(&self.file)),
            end: Position::new(self.pos + len, Rc::clone(&self.file)),
        }
    }

    fn skip_whitespace(&mut self) {
        if let Some(matched) = WHITESPACE.find(self.remainder()) {
            let len = matched.end();
            self.advance_n(len);
        }
    }
}

/// Yields every token up to and including the first `EOF`.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        let token = self.next_token();
        if token.is(TokenKind::EOF) {
            self.emitted_eof = true;
        }

        Some(token)
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Token {
    let matched = regex
        .find(lexer.remainder())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let token = MK_TOKEN!(TokenKind::Int, matched.clone(), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    token
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Token {
    let matched = regex
        .find(lexer.remainder())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let token = MK_TOKEN!(lookup_ident(&matched), matched.clone(), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    token
}

/// Scans a whole source into tokens, ending with a single `EOF`.
pub fn tokenize(source: &str, file: Option<String>) -> Vec<Token> {
    Lexer::new(source, file).collect()
}
