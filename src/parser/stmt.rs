//! Statement classification.
//!
//! A statement is routed by its leading keyword (`return`, `const`, `import`,
//! `func`, `if`, `while`, `else`). Everything else is either an assignment,
//! split at its first top-level assignment operator, or a bare expression.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        expressions::{ExprToken, Param},
        statements::{ElseBranch, FuncStmt, IfStmt, VarStmt, VarTarget, WhileStmt},
        types::TypeNode,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Cursor,
        tokens::{match_operator, Keyword, Operator, RESERVED_LOOKUP},
    },
};

use super::{
    expr::{is_identifier, parse_access_chain, scan_expression},
    parser::{else_branch_from, parse_block, Parser},
    types::parse_type,
};

lazy_static! {
    /// `<type> <name>` on the left of a declaration.
    static ref DECL_LHS: Regex =
        Regex::new(r"^([\p{L}_][\p{L}\p{N}_<>,|\s]*?)\s+([\p{L}_][\p{L}\p{N}_]*)$").unwrap();
}

/// The identifier-like prefix of a statement, used for keyword dispatch.
pub fn leading_word(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

fn keyword_of(text: &str) -> Option<Keyword> {
    RESERVED_LOOKUP.get(leading_word(text)).copied()
}

/// Parses one statement string.
pub fn parse_command(parser: &mut Parser, text: &str, line: usize) -> Result<Stmt, Error> {
    let text = text.trim();

    match keyword_of(text) {
        Some(Keyword::Return) => parse_return(parser, text, line),
        Some(Keyword::Const) => parse_const(parser, text, line),
        Some(Keyword::Import) => parse_import(text, line),
        Some(Keyword::Func) if split_assignment(text).is_none() => parse_func(parser, text, line),
        Some(Keyword::If) => {
            let (condition, body) = parse_conditional(parser, text, line, "if")?;
            Ok(Stmt::new(
                StmtKind::If(IfStmt {
                    condition,
                    body,
                    else_branch: None,
                }),
                line,
            ))
        }
        Some(Keyword::While) => {
            let (condition, body) = parse_conditional(parser, text, line, "while")?;
            Ok(Stmt::new(
                StmtKind::While(WhileStmt { condition, body }),
                line,
            ))
        }
        Some(Keyword::Else) => Err(Error::new(ErrorImpl::DanglingElse, line)),
        _ => parse_assignment_or_expression(parser, text, line, false),
    }
}

/// Parses the text of an `else` statement into the branch it contributes.
pub fn parse_else(parser: &mut Parser, text: &str, line: usize) -> Result<ElseBranch, Error> {
    let rest = text.trim()["else".len()..].trim_start();

    if keyword_of(rest) == Some(Keyword::If) {
        let stmt = parse_command(parser, rest, line)?;
        return else_branch_from(stmt).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnexpectedToken {
                    token: rest.to_string(),
                },
                line,
            )
        });
    }

    let mut cursor = Cursor::new(rest);
    let body = parse_block(parser, &mut cursor, line)?;
    ensure_consumed(&mut cursor, line)?;

    Ok(ElseBranch::Block(body))
}

fn parse_return(parser: &mut Parser, text: &str, line: usize) -> Result<Stmt, Error> {
    let rest = text["return".len()..].trim();

    let value = if rest.is_empty() {
        None
    } else {
        Some(scan_expression(parser, rest, line)?)
    };

    Ok(Stmt::new(StmtKind::Return(value), line))
}

fn parse_const(parser: &mut Parser, text: &str, line: usize) -> Result<Stmt, Error> {
    let rest = text["const".len()..].trim();

    // `func` doubles as a type name, so `const func f = ...` is a declaration.
    let declares_func = split_assignment(rest).is_some();
    if keyword_of(rest).is_some_and(|keyword| keyword != Keyword::Func || !declares_func) {
        return Err(Error::new(
            ErrorImpl::UnexpectedKeyword {
                keyword: String::from("const"),
            },
            line,
        ));
    }

    parse_assignment_or_expression(parser, rest, line, true)
}

fn parse_import(text: &str, line: usize) -> Result<Stmt, Error> {
    let mut cursor = Cursor::new(&text["import".len()..]);
    cursor.skip_whitespace();

    if cursor.at() != Some('"') {
        return Err(Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("\""),
            },
            line,
        ));
    }
    cursor.advance();

    let mut from = String::new();
    loop {
        match cursor.at() {
            Some('"') => {
                cursor.advance();
                break;
            }
            Some(c) => {
                from.push(c);
                cursor.advance();
            }
            None => {
                return Err(Error::new(
                    ErrorImpl::ExpectedToken {
                        expected: String::from("\""),
                    },
                    line,
                ))
            }
        }
    }

    ensure_consumed(&mut cursor, line)?;
    Ok(Stmt::new(StmtKind::Import { from }, line))
}

fn parse_func(parser: &mut Parser, text: &str, line: usize) -> Result<Stmt, Error> {
    let mut cursor = Cursor::new(text);
    cursor.advance_n("func".len());

    let mut header = String::new();
    while let Some(c) = cursor.at().filter(|c| *c != '(') {
        header.push(c);
        cursor.advance();
    }
    if cursor.at_eof() {
        return Err(Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("("),
            },
            line,
        ));
    }

    let header = header.trim();
    let Some(split) = header.rfind(char::is_whitespace) else {
        return Err(Error::new(ErrorImpl::ExpectedReturnType, line));
    };
    let (type_text, name) = (header[..split].trim(), header[split..].trim());

    if !is_identifier(name) {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: name.to_string(),
            },
            line,
        ));
    }
    let return_type = parse_type(type_text).map_err(|e| Error::new(e, line))?;

    let params_text = cursor.take_balanced('(', ')').ok_or_else(|| {
        Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from(")"),
            },
            line,
        )
    })?;
    let params = parse_params(&params_text, false).map_err(|e| Error::new(e, line))?;

    let body = parse_block(parser, &mut cursor, line)?;
    ensure_consumed(&mut cursor, line)?;

    Ok(Stmt::new(
        StmtKind::Func(FuncStmt {
            name: name.to_string(),
            params,
            return_type,
            body,
        }),
        line,
    ))
}

/// Parses `<keyword> (<condition>) { <body> }`.
fn parse_conditional(
    parser: &mut Parser,
    text: &str,
    line: usize,
    keyword: &str,
) -> Result<(Vec<ExprToken>, Vec<Stmt>), Error> {
    let mut cursor = Cursor::new(text);
    cursor.advance_n(keyword.len());
    cursor.skip_whitespace();

    if cursor.at() != Some('(') {
        return Err(Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("("),
            },
            line,
        ));
    }
    let condition_text = cursor.take_balanced('(', ')').ok_or_else(|| {
        Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from(")"),
            },
            line,
        )
    })?;

    let condition = scan_expression(parser, &condition_text, line)?;
    let body = parse_block(parser, &mut cursor, line)?;
    ensure_consumed(&mut cursor, line)?;

    Ok((condition, body))
}

fn parse_assignment_or_expression(
    parser: &mut Parser,
    text: &str,
    line: usize,
    constant: bool,
) -> Result<Stmt, Error> {
    let unexpected_const = || {
        Error::new(
            ErrorImpl::UnexpectedKeyword {
                keyword: String::from("const"),
            },
            line,
        )
    };

    let Some((lhs, op, rhs)) = split_assignment(text) else {
        if constant {
            return Err(unexpected_const());
        }

        let mut tokens = scan_expression(parser, text, line)?;
        if let [ExprToken::FuncActivation { .. }] = tokens.as_slice() {
            if let Some(ExprToken::FuncActivation { callee, args }) = tokens.pop() {
                return Ok(Stmt::new(StmtKind::FuncActivation { callee, args }, line));
            }
        }
        return Ok(Stmt::new(StmtKind::Expr(tokens), line));
    };

    let lhs = lhs.trim();
    let rhs = rhs.trim();
    if rhs.is_empty() {
        return Err(Error::new(ErrorImpl::UnexpectedEndOfExpression, line));
    }

    let target = if let Some(captures) = DECL_LHS.captures(lhs) {
        if op != Operator::Assign {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: op.to_string(),
                },
                line,
            ));
        }
        let decl_type = parse_type(&captures[1]).map_err(|e| Error::new(e, line))?;
        VarTarget::Declare {
            name: captures[2].to_string(),
            decl_type,
        }
    } else {
        if constant {
            return Err(unexpected_const());
        }
        VarTarget::Modify(parse_access_chain(parser, lhs, line)?)
    };

    let value = scan_expression(parser, rhs, line)?;

    Ok(Stmt::new(
        StmtKind::Var(VarStmt {
            target,
            op,
            value,
            constant,
        }),
        line,
    ))
}

/// Splits `text` at its first top-level assignment operator. Comparison
/// operators and the `=>` of a lambda are not assignments.
pub fn split_assignment(text: &str) -> Option<(String, Operator, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            match c {
                '\\' => i += 1,
                '"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if depth == 0 => {
                if let Some(op) = match_operator(&chars, i) {
                    let len = op.as_str().chars().count();
                    let is_arrow = op == Operator::Assign && chars.get(i + 1) == Some(&'>');

                    if op.is_assignment() && !is_arrow {
                        let lhs = chars[..i].iter().collect();
                        let rhs = chars[i + len..].iter().collect();
                        return Some((lhs, op, rhs));
                    }

                    i += len;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Splits a parameter list at commas outside of `<...>` and brackets.
fn split_params(text: &str) -> Vec<String> {
    let mut params = vec![];
    let mut current = String::new();
    let mut depth = 0i32;

    for c in text.chars() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                params.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if !current.trim().is_empty() {
        params.push(current.trim().to_string());
    }

    params
}

/// Parses `<type> <name>, ...`. Lambdas may leave out the type, which then
/// defaults to `any`.
pub(crate) fn parse_params(text: &str, allow_untyped: bool) -> Result<Vec<Param>, ErrorImpl> {
    split_params(text)
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| parse_param(p, allow_untyped))
        .collect()
}

fn parse_param(text: &str, allow_untyped: bool) -> Result<Param, ErrorImpl> {
    let invalid = || ErrorImpl::InvalidParameter {
        parameter: text.to_string(),
    };

    let (param_type, name) = match text.rfind(char::is_whitespace) {
        Some(split) => (parse_type(&text[..split])?, text[split..].trim()),
        None if allow_untyped => (TypeNode::any(), text),
        None => return Err(invalid()),
    };

    if !is_identifier(name) {
        return Err(invalid());
    }

    Ok(Param {
        name: name.to_string(),
        param_type,
    })
}

fn ensure_consumed(cursor: &mut Cursor, line: usize) -> Result<(), Error> {
    cursor.skip_whitespace();
    if cursor.at_eof() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: cursor.remainder().trim().to_string(),
            },
            line,
        ))
    }
}
