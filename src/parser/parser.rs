//! Parser entry points.
//!
//! The parser works on statement strings produced by the tokenizer. Each
//! statement is classified by its leading keyword or by the shape of its
//! assignment, and expression regions are handed to the character scanner
//! in `expr`. Blocks are re-tokenized and parsed recursively.
//!
//! Parsing is all or nothing: any diagnostic empties the returned AST, but
//! every statement is still visited so all problems are reported together.

use log::debug;

use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        statements::ElseBranch,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::{tokenize, Cursor, Statement},
};

use super::stmt::{leading_word, parse_command, parse_else};

/// Accumulates diagnostics while a source file is parsed.
#[derive(Debug, Default)]
pub struct Parser {
    pub errors: Vec<Error>,
}

impl Parser {
    pub fn new() -> Self {
        Parser { errors: vec![] }
    }

    pub fn error(&mut self, error_impl: ErrorImpl, line: usize) {
        self.errors.push(Error::new(error_impl, line));
    }
}

#[derive(Debug)]
pub struct ParseOutput {
    pub ast: Vec<Stmt>,
    pub errors: Vec<Error>,
}

/// Parses a complete source file.
pub fn parse(source: &str) -> ParseOutput {
    let mut parser = Parser::new();
    let statements = tokenize(source, 1, &mut parser.errors);
    let ast = parse_level(&mut parser, &statements);

    debug!(
        "parsed {} top-level statement(s) with {} error(s)",
        ast.len(),
        parser.errors.len()
    );

    if parser.errors.is_empty() {
        ParseOutput { ast, errors: vec![] }
    } else {
        ParseOutput {
            ast: vec![],
            errors: parser.errors,
        }
    }
}

/// Parses one level of statements. `else` statements are attached to the
/// `if` directly before them.
pub fn parse_level(parser: &mut Parser, statements: &[Statement]) -> Vec<Stmt> {
    let mut ast: Vec<Stmt> = vec![];

    for statement in statements {
        if statement.text.is_empty() {
            continue;
        }

        if leading_word(&statement.text) == "else" {
            let branch = match parse_else(parser, &statement.text, statement.line) {
                Ok(branch) => branch,
                Err(error) => {
                    parser.errors.push(error);
                    continue;
                }
            };

            let attached = match ast.last_mut() {
                Some(Stmt {
                    kind: StmtKind::If(if_stmt),
                    ..
                }) => if_stmt.attach_else(branch).is_ok(),
                _ => false,
            };

            if !attached {
                parser.error(ErrorImpl::DanglingElse, statement.line);
            }
            continue;
        }

        match parse_command(parser, &statement.text, statement.line) {
            Ok(stmt) => ast.push(stmt),
            Err(error) => parser.errors.push(error),
        }
    }

    ast
}

/// Parses the `{ ... }` block at the cursor. `line` is the line the text
/// under the cursor starts on.
pub fn parse_block(
    parser: &mut Parser,
    cursor: &mut Cursor,
    line: usize,
) -> Result<Vec<Stmt>, Error> {
    cursor.skip_whitespace();
    if cursor.at() != Some('{') {
        return Err(Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("{"),
            },
            line,
        ));
    }

    let body_line = line + newlines_before(cursor);
    let body = cursor.take_balanced('{', '}').ok_or_else(|| {
        Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("}"),
            },
            line,
        )
    })?;

    let statements = tokenize(&body, body_line, &mut parser.errors);
    Ok(parse_level(parser, &statements))
}

/// Builds the `else` branch for an `if` chain.
pub(crate) fn else_branch_from(stmt: Stmt) -> Option<ElseBranch> {
    match stmt.kind {
        StmtKind::If(if_stmt) => Some(ElseBranch::If {
            line: stmt.line,
            if_stmt: Box::new(if_stmt),
        }),
        _ => None,
    }
}

/// Number of newlines between the start of the cursor's text and its
/// current position.
pub(crate) fn newlines_before(cursor: &Cursor) -> usize {
    cursor.chars()[..cursor.pos()]
        .iter()
        .filter(|c| **c == '\n')
        .count()
}
