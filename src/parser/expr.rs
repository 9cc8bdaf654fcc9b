//! The expression scanner.
//!
//! A character state machine (`Start`, `Number`, `Variable`, `String`) walks
//! an expression left to right and produces a flat list of tokens.
//! Parentheses, brackets and braces are cut out with balanced scanning and
//! handled recursively: as groups, call arguments, lambda parameter lists,
//! index expressions or JSON literals. No precedence is applied here.

use serde_json::Value;

use crate::{
    ast::{
        expressions::{AccessChain, AccessStep, ExprToken, JsonLiteral, Lambda},
        types::TypeNode,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{split_args, Cursor},
        tokens::{match_operator, Operator, RESERVED_LOOKUP},
    },
};

use super::{
    parser::{parse_block, Parser},
    stmt::parse_params,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Start,
    Number,
    Variable,
    String,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_') && chars.all(is_ident_char)
}

/// Decodes the digits of a `\uXXXX` or `\u{X...}` escape, leaving the cursor
/// untouched when they do not form a valid code point.
fn unicode_escape(cursor: &mut Cursor) -> Option<char> {
    let (digits, len) = if cursor.at() == Some('{') {
        let digits: String = (1..)
            .map_while(|n| cursor.peek(n).filter(|c| *c != '}'))
            .collect();
        if cursor.peek(digits.chars().count() + 1) != Some('}') {
            return None;
        }
        let len = digits.chars().count() + 2;
        (digits, len)
    } else {
        let digits: String = (0..4).filter_map(|n| cursor.peek(n)).collect();
        (digits, 4)
    };

    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if len == 4 && digits.len() != 4 {
        return None;
    }

    let decoded = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)?;
    cursor.advance_n(len);
    Some(decoded)
}

fn expected(token: &str, line: usize) -> Error {
    Error::new(
        ErrorImpl::ExpectedToken {
            expected: token.to_string(),
        },
        line,
    )
}

/// Tokens collected so far, plus an `await` waiting for its operand.
struct Scan {
    tokens: Vec<ExprToken>,
    pending_await: bool,
    line: usize,
}

impl Scan {
    fn last_is_value(&self) -> bool {
        self.tokens.last().is_some_and(ExprToken::is_value)
    }

    fn push_value(&mut self, token: ExprToken) -> Result<(), Error> {
        if self.last_is_value() {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: describe(&token),
                },
                self.line,
            ));
        }

        if self.pending_await {
            self.pending_await = false;
            self.tokens.push(ExprToken::Await(Box::new(token)));
        } else {
            self.tokens.push(token);
        }
        Ok(())
    }

    fn push_operator(&mut self, op: Operator) -> Result<(), Error> {
        if op.is_assignment() || self.pending_await {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: op.to_string(),
                },
                self.line,
            ));
        }
        self.tokens.push(ExprToken::Operator(op));
        Ok(())
    }

    fn flush_number(&mut self, temp: &mut String) -> Result<(), Error> {
        let text = std::mem::take(temp);
        let value = text.parse::<f64>().map_err(|_| {
            Error::new(
                ErrorImpl::InvalidLiteral {
                    message: format!("invalid number '{}'", text),
                },
                self.line,
            )
        })?;
        self.push_value(ExprToken::Number(value))
    }

    fn flush_word(&mut self, parser: &mut Parser, temp: &mut String) -> Result<(), Error> {
        let word = std::mem::take(temp);

        match word.as_str() {
            "true" => self.push_value(ExprToken::Bool(true)),
            "false" => self.push_value(ExprToken::Bool(false)),
            "null" => self.push_value(ExprToken::Null),
            "await" if !self.pending_await && !self.last_is_value() => {
                self.pending_await = true;
                Ok(())
            }
            keyword if RESERVED_LOOKUP.contains_key(keyword) => Err(Error::new(
                ErrorImpl::UnexpectedKeyword {
                    keyword: keyword.to_string(),
                },
                self.line,
            )),
            _ => {
                let chain = parse_access_chain(parser, &word, self.line)?;
                self.push_value(ExprToken::Variable(chain))
            }
        }
    }
}

fn describe(token: &ExprToken) -> String {
    match token {
        ExprToken::Number(n) => n.to_string(),
        ExprToken::String(s) => format!("\"{}\"", s),
        ExprToken::Bool(b) => b.to_string(),
        ExprToken::Null => String::from("null"),
        ExprToken::Variable(chain) | ExprToken::FuncActivation { callee: chain, .. } => {
            chain.base.clone()
        }
        ExprToken::Operator(op) => op.to_string(),
        ExprToken::Group(_) => String::from("("),
        ExprToken::Object(_) => String::from("{"),
        ExprToken::Array(_) => String::from("["),
        ExprToken::Func(_) => String::from("=>"),
        ExprToken::Await(_) => String::from("await"),
    }
}

/// Scans one expression into a flat token list.
pub fn scan_expression(
    parser: &mut Parser,
    text: &str,
    line: usize,
) -> Result<Vec<ExprToken>, Error> {
    let mut cursor = Cursor::new(text);
    let mut scan = Scan {
        tokens: vec![],
        pending_await: false,
        line,
    };
    let mut state = ScanState::Start;
    let mut temp = String::new();

    while let Some(c) = cursor.at() {
        match state {
            ScanState::String => {
                cursor.advance();
                match c {
                    '"' => {
                        scan.push_value(ExprToken::String(std::mem::take(&mut temp)))?;
                        state = ScanState::Start;
                    }
                    '\\' => {
                        let escaped = cursor.at();
                        cursor.advance();
                        match escaped {
                            Some('n') => temp.push('\n'),
                            Some('t') => temp.push('\t'),
                            Some('r') => temp.push('\r'),
                            Some('"') => temp.push('"'),
                            Some('\\') => temp.push('\\'),
                            Some('u') => match unicode_escape(&mut cursor) {
                                Some(decoded) => temp.push(decoded),
                                None => temp.push_str("\\u"),
                            },
                            Some(other) => {
                                temp.push('\\');
                                temp.push(other);
                            }
                            None => temp.push('\\'),
                        }
                    }
                    _ => temp.push(c),
                }
            }
            ScanState::Number => {
                if c.is_ascii_digit() || c == '.' {
                    temp.push(c);
                    cursor.advance();
                } else {
                    scan.flush_number(&mut temp)?;
                    state = ScanState::Start;
                }
            }
            ScanState::Variable => {
                if is_ident_char(c) || c == '.' {
                    temp.push(c);
                    cursor.advance();
                } else if c == '[' {
                    let index = cursor
                        .take_balanced('[', ']')
                        .ok_or_else(|| expected("]", line))?;
                    temp.push('[');
                    temp.push_str(&index);
                    temp.push(']');
                } else if c == '(' {
                    let args_text = cursor
                        .take_balanced('(', ')')
                        .ok_or_else(|| expected(")", line))?;
                    let callee = parse_access_chain(parser, &temp, line)?;
                    temp.clear();

                    let args = split_args(&args_text)
                        .iter()
                        .map(|arg| scan_expression(parser, arg, line))
                        .collect::<Result<Vec<_>, _>>()?;

                    scan.push_value(ExprToken::FuncActivation { callee, args })?;
                    state = ScanState::Start;
                } else {
                    scan.flush_word(parser, &mut temp)?;
                    state = ScanState::Start;
                }
            }
            ScanState::Start => {
                let next_is_digit = cursor.peek(1).is_some_and(|n| n.is_ascii_digit());

                if c.is_whitespace() {
                    cursor.advance();
                } else if c == '"' {
                    state = ScanState::String;
                    cursor.advance();
                } else if c == '(' {
                    scan_parenthesized(parser, &mut cursor, &mut scan)?;
                } else if c == '{' || c == '[' {
                    let literal = scan_json_literal(&mut cursor, line)?;
                    scan.push_value(literal)?;
                } else if c.is_ascii_digit()
                    || (c == '.' && next_is_digit)
                    || (c == '-' && next_is_digit && !scan.last_is_value())
                {
                    state = ScanState::Number;
                    temp.push(c);
                    cursor.advance();
                } else if let Some(op) = match_operator(cursor.chars(), cursor.pos()) {
                    scan.push_operator(op)?;
                    cursor.advance_n(op.as_str().chars().count());
                } else if is_ident_char(c) {
                    state = ScanState::Variable;
                    temp.push(c);
                    cursor.advance();
                } else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedToken {
                            token: c.to_string(),
                        },
                        line,
                    ));
                }
            }
        }
    }

    match state {
        ScanState::String => return Err(expected("\"", line)),
        ScanState::Number => scan.flush_number(&mut temp)?,
        ScanState::Variable => scan.flush_word(parser, &mut temp)?,
        ScanState::Start => {}
    }

    let dangling = match scan.tokens.last() {
        None => true,
        Some(last) => !last.is_value(),
    };
    if dangling || scan.pending_await {
        return Err(Error::new(ErrorImpl::UnexpectedEndOfExpression, line));
    }

    Ok(scan.tokens)
}

/// Handles a `(` in operand position: either a lambda `(params) => { ... }`
/// or a parenthesized group.
fn scan_parenthesized(
    parser: &mut Parser,
    cursor: &mut Cursor,
    scan: &mut Scan,
) -> Result<(), Error> {
    let line = scan.line;
    let mut lookahead = cursor.clone();
    let inner = lookahead
        .take_balanced('(', ')')
        .ok_or_else(|| expected(")", line))?;
    lookahead.skip_whitespace();

    if lookahead.starts_with("=>") {
        lookahead.advance_n(2);
        lookahead.skip_whitespace();
        if lookahead.at() != Some('{') {
            return Err(Error::new(ErrorImpl::ArrowWithoutBlock, line));
        }

        let params = parse_params(&inner, true).map_err(|e| Error::new(e, line))?;
        let body = parse_block(parser, &mut lookahead, line)?;
        scan.push_value(ExprToken::Func(Lambda { params, body }))?;
    } else {
        let tokens = scan_expression(parser, &inner, line)?;
        scan.push_value(ExprToken::Group(tokens))?;
    }

    *cursor = lookahead;
    Ok(())
}

fn scan_json_literal(cursor: &mut Cursor, line: usize) -> Result<ExprToken, Error> {
    let (open, close) = match cursor.at() {
        Some('{') => ('{', '}'),
        _ => ('[', ']'),
    };
    let inner = cursor
        .take_balanced(open, close)
        .ok_or_else(|| expected(&close.to_string(), line))?;
    let raw = format!("{}{}{}", open, inner, close);

    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        Error::new(
            ErrorImpl::InvalidLiteral {
                message: e.to_string(),
            },
            line,
        )
    })?;

    let literal = JsonLiteral {
        element_type: infer_element_type(&value),
        value,
    };

    Ok(if open == '{' {
        ExprToken::Object(literal)
    } else {
        ExprToken::Array(literal)
    })
}

/// `string` or `number` when every value has that type, `any` otherwise.
pub fn infer_element_type(value: &Value) -> TypeNode {
    let values: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => vec![],
    };

    if values.is_empty() {
        TypeNode::any()
    } else if values.iter().all(|v| v.is_string()) {
        TypeNode::string()
    } else if values.iter().all(|v| v.is_number()) {
        TypeNode::number()
    } else {
        TypeNode::any()
    }
}

/// Parses `base.prop[index]...`. The whole text must be consumed.
pub fn parse_access_chain(
    parser: &mut Parser,
    text: &str,
    line: usize,
) -> Result<AccessChain, Error> {
    let text = text.trim();
    let unexpected = || {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: text.to_string(),
            },
            line,
        )
    };

    let mut cursor = Cursor::new(text);
    let mut base = String::new();
    while let Some(c) = cursor.at().filter(|c| is_ident_char(*c)) {
        base.push(c);
        cursor.advance();
    }
    if !is_identifier(&base) {
        return Err(unexpected());
    }

    let mut steps = vec![];
    while let Some(c) = cursor.at() {
        match c {
            '.' => {
                cursor.advance();
                let mut prop = String::new();
                while let Some(c) = cursor.at().filter(|c| is_ident_char(*c)) {
                    prop.push(c);
                    cursor.advance();
                }
                if prop.is_empty() {
                    return Err(unexpected());
                }
                steps.push(AccessStep::Prop(prop));
            }
            '[' => {
                let index = cursor
                    .take_balanced('[', ']')
                    .ok_or_else(|| expected("]", line))?;
                steps.push(AccessStep::Index(scan_expression(parser, &index, line)?));
            }
            _ => return Err(unexpected()),
        }
    }

    Ok(AccessChain { base, steps })
}
