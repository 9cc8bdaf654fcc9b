//! Unit tests for the tokenizer.
//!
//! Covers statement splitting, comments, strings containing structural
//! characters, line tracking and the missing semicolon diagnostic.

use super::{
    lexer::{split_args, tokenize, Cursor},
    tokens::{match_operator, Operator},
};
use crate::errors::errors::ErrorCategory;

fn texts(source: &str) -> Vec<String> {
    let mut errors = vec![];
    tokenize(source, 1, &mut errors)
        .into_iter()
        .map(|s| s.text)
        .collect()
}

#[test]
fn test_tokenize_semicolons() {
    assert_eq!(texts("int a = 1; int b = 2;"), vec!["int a = 1", "int b = 2"]);
}

#[test]
fn test_tokenize_block_is_one_statement() {
    let source = "func int add() {\n  int a = 1;\n  return a;\n}\nint b = 2;";
    let statements = texts(source);

    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("func int add()"));
    assert!(statements[0].ends_with('}'));
    assert_eq!(statements[1], "int b = 2");
}

#[test]
fn test_tokenize_strings_hide_structure() {
    let statements = texts("string s = \"a; { // not a comment\";");
    assert_eq!(statements, vec!["string s = \"a; { // not a comment\""]);
}

#[test]
fn test_tokenize_escaped_quote() {
    let statements = texts("string s = \"say \\\"hi;\\\"\";");
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_tokenize_comments() {
    let source = "int a = 1; // trailing\n/* block\ncomment */\nint b = 2;";
    let mut errors = vec![];
    let statements = tokenize(source, 1, &mut errors);

    assert!(errors.is_empty());
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[1].text, "int b = 2");
    assert_eq!(statements[1].line, 4);
}

#[test]
fn test_tokenize_line_numbers() {
    let source = "int a = 1;\n\nint b = 2;\nif (true) {\n  a = 2;\n}";
    let mut errors = vec![];
    let statements = tokenize(source, 1, &mut errors);

    assert_eq!(statements[0].line, 1);
    assert_eq!(statements[1].line, 3);
    assert_eq!(statements[2].line, 4);
}

#[test]
fn test_tokenize_first_line_offset() {
    let mut errors = vec![];
    let statements = tokenize("\n  int a = 1;\n", 10, &mut errors);
    assert_eq!(statements[0].line, 11);
}

#[test]
fn test_missing_semicolon_reported_once() {
    let source = "int a = 1\nint b = 2;\n";
    let mut errors = vec![];
    let statements = tokenize(source, 1, &mut errors);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_line(), 1);
    assert_eq!(errors[0].get_category(), ErrorCategory::SyntaxError);
    assert_eq!(errors[0].get_message(), "Expected semicolon");
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_no_semicolon_needed_after_block() {
    let mut errors = vec![];
    tokenize("while (true) {\n  int a = 1;\n}\nint b = 1;\n", 1, &mut errors);
    assert!(errors.is_empty());
}

#[test]
fn test_multiline_call_arguments() {
    let mut errors = vec![];
    let statements = tokenize("print(1,\n  2);\n", 1, &mut errors);
    assert!(errors.is_empty());
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_rejoin_is_stable() {
    let source = "int a = 1;\nfunc void f() {\n  a = 2;\n}\nstring s = \"x;y\";\nprint(a);";
    let first = texts(source);
    let rejoined = first.join(";");
    assert_eq!(texts(&rejoined), first);
}

#[test]
fn test_cursor_take_balanced() {
    let mut cursor = Cursor::new("(a, (b), \")\") rest");
    let inner = cursor.take_balanced('(', ')');

    assert_eq!(inner.as_deref(), Some("a, (b), \")\""));
    assert_eq!(cursor.remainder(), " rest");
}

#[test]
fn test_cursor_take_balanced_unclosed() {
    let mut cursor = Cursor::new("{ a");
    assert!(cursor.take_balanced('{', '}').is_none());
    assert!(cursor.at_eof());
}

#[test]
fn test_split_args() {
    assert_eq!(
        split_args("1, f(2, 3), \"a,b\", [4, 5]"),
        vec!["1", "f(2, 3)", "\"a,b\"", "[4, 5]"]
    );
    assert!(split_args("  ").is_empty());
}

#[test]
fn test_match_operator_longest() {
    let chars: Vec<char> = "<= 1".chars().collect();
    assert_eq!(match_operator(&chars, 0), Some(Operator::LessEquals));

    let chars: Vec<char> = "+=".chars().collect();
    assert_eq!(match_operator(&chars, 0), Some(Operator::AddAssign));

    let chars: Vec<char> = "abc".chars().collect();
    assert_eq!(match_operator(&chars, 0), None);
}
