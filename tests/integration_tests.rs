//! Integration tests for the public front end.
//!
//! These tests drive whole programs through `mana::tokenize` and
//! `mana::parse` and check the tokens, the tree shape, the canonical
//! rendering and the reported errors.

use mana::{
    ast::ast::{Expr, Node, Stmt},
    get_line_at_position,
    lexer::tokens::TokenKind,
    parse, tokenize,
};

const PROGRAM: &str = "let five = 5;
let ten = 10;

let add = fn(x, y) {
  x + y;
};

let result = add(five, ten);
5 < 10 > 5;

if (5 < 10) {
    return true;
} else {
    return false;
}

10 == 10;
10 != 9;
";

#[test]
fn test_tokenize_program() {
    let tokens = tokenize(PROGRAM, Some("program.mana".to_string()));

    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EOF));
    assert_eq!(
        tokens.iter().filter(|t| t.kind == TokenKind::EOF).count(),
        1
    );
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Illegal));
    assert!(tokens
        .iter()
        .all(|t| t.span.start.1.as_str() == "program.mana"));

    let head: Vec<TokenKind> = tokens.iter().take(10).map(|t| t.kind).collect();
    assert_eq!(
        head,
        vec![
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Int,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_tokenize_operator_soup() {
    let kinds: Vec<TokenKind> = tokenize("!-/*5;", None).iter().map(|t| t.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_parse_program() {
    let (program, errors) = parse(PROGRAM, Some("program.mana".to_string()));

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(program.len(), 8);
    assert_eq!(program.token_literal(), "let");
    assert_eq!(
        program.to_string(),
        "let five = 5;\
         let ten = 10;\
         let add = fn(x, y) { (x + y); };\
         let result = add(five, ten);\
         ((5 < 10) > 5);\
         if ((5 < 10)) { return true; } else { return false; };\
         (10 == 10);\
         (10 != 9);"
    );
}

#[test]
fn test_program_tree_shape() {
    let (program, errors) = parse(PROGRAM, None);
    assert!(errors.is_empty());

    let Some(Stmt::Let(add)) = program.statements.get(2) else {
        panic!("expected `let add`");
    };
    assert_eq!(add.name.value, "add");
    let Expr::Function(function) = &add.value else {
        panic!("expected a function literal");
    };
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.body.statements.len(), 1);

    let Some(Stmt::Expression(stmt)) = program.statements.get(5) else {
        panic!("expected an if expression statement");
    };
    let Expr::If(if_expr) = &stmt.expression else {
        panic!("expected an if expression");
    };
    assert!(matches!(
        if_expr.consequence.statements.as_slice(),
        [Stmt::Return(_)]
    ));
    assert!(if_expr.alternative.is_some());
}

#[test]
fn test_spans_cover_source_text() {
    let (program, errors) = parse(PROGRAM, None);
    assert!(errors.is_empty());

    let Some(stmt) = program.statements.get(3) else {
        panic!("expected four statements");
    };
    let span = stmt.span();
    let text = &PROGRAM[span.start.0 as usize..span.end.0 as usize];
    assert_eq!(text, "let result = add(five, ten);");
}

#[test]
fn test_canonical_rendering_reparses_to_itself() {
    let (program, _) = parse(PROGRAM, None);
    let rendered = program.to_string();

    let (reparsed, errors) = parse(&rendered, None);
    assert!(errors.is_empty());
    assert_eq!(reparsed.len(), program.len());
    assert_eq!(reparsed.to_string(), rendered);
}

#[test]
fn test_errors_report_every_bad_statement() {
    let source = "let x = 1;\nlet y 2;\nlet = 3;\nlet z = x + @;\nlet ok = z;";
    let (program, errors) = parse(source, Some("broken.mana".to_string()));

    assert_eq!(program.to_string(), "let x = 1;let ok = z;");

    let reported: Vec<(String, usize, usize)> = errors
        .iter()
        .map(|error| {
            let (line, _, column) =
                get_line_at_position(source, error.get_position().0).unwrap();
            (error.to_string(), line, column)
        })
        .collect();

    assert_eq!(
        reported,
        vec![
            (
                "expected next token to be =, got INT instead".to_string(),
                2,
                6
            ),
            (
                "expected next token to be IDENT, got = instead".to_string(),
                3,
                4
            ),
            (
                "no prefix parse function for ILLEGAL found".to_string(),
                4,
                12
            ),
        ]
    );
    assert_eq!(errors[2].get_error_name(), "NoPrefixParseFn");
    assert!(errors
        .iter()
        .all(|error| error.get_position().1.as_str() == "broken.mana"));
}

#[test]
fn test_error_at_end_of_input() {
    let source = "let f = fn(a) {\n  a + 1;\n";
    let (program, errors) = parse(source, None);

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "expected next token to be }, got EOF instead"
    );
    assert_eq!(errors[0].get_position().0 as usize, source.len());
    assert_eq!(errors[0].get_tip().to_string(), "is a closing `}` missing?");
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse(PROGRAM, None);
    let second = parse(PROGRAM, None);

    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}
