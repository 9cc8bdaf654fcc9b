use log::debug;
use serde::Serialize;

use crate::errors::errors::{Error, ErrorImpl};

/// One logical statement of source text and the line it starts on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub text: String,
    pub line: usize,
}

/// A position over a character buffer, shared by the tokenizer and the
/// expression scanner.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Cursor {
        Cursor {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn at(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn remainder(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    pub fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    pub fn skip_whitespace(&mut self) {
        while self.at().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Consumes a balanced `open ... close` region starting at the current
    /// character and returns its interior. String literals are skipped over.
    /// Returns `None` when the region never closes; the cursor is then left
    /// at the end of input.
    pub fn take_balanced(&mut self, open: char, close: char) -> Option<String> {
        if self.at() != Some(open) {
            return None;
        }
        self.advance();

        let mut depth = 1;
        let mut in_string = false;
        let mut interior = String::new();

        while let Some(c) = self.at() {
            self.advance();

            if in_string {
                interior.push(c);
                if c == '\\' {
                    if let Some(escaped) = self.at() {
                        interior.push(escaped);
                        self.advance();
                    }
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }

            if c == '"' {
                in_string = true;
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(interior);
                }
            }
            interior.push(c);
        }

        None
    }
}

/// Splits an argument or parameter list at top-level commas.
pub fn split_args(source: &str) -> Vec<String> {
    let mut args = vec![];
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for c in source.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }

    args
}

struct Splitter {
    statements: Vec<Statement>,
    current: String,
    start_line: Option<usize>,
}

impl Splitter {
    fn push(&mut self, c: char, line: usize) {
        if self.start_line.is_none() && !c.is_whitespace() {
            self.start_line = Some(line);
        }
        self.current.push(c);
    }

    fn flush(&mut self, line: usize) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.statements.push(Statement {
                text: text.to_string(),
                line: self.start_line.unwrap_or(line),
            });
        }
        self.current.clear();
        self.start_line = None;
    }
}

/// Splits source text into statements.
///
/// Statements end at a top-level `;`, at the `}` that closes a top-level
/// block, or at a newline. A newline that ends real code which was not
/// terminated by `;` or `}` reports `Expected semicolon` for that line.
/// `first_line` is the 1-based line of the first character of `source`.
pub fn tokenize(source: &str, first_line: usize, errors: &mut Vec<Error>) -> Vec<Statement> {
    let mut cursor = Cursor::new(source);
    let mut splitter = Splitter {
        statements: vec![],
        current: String::new(),
        start_line: None,
    };

    let mut line = first_line;
    let mut brace_depth = 0i32;
    let mut paren_depth = 0i32;
    let mut in_string = false;
    let mut terminated = true;
    let mut code_since_boundary = false;

    while let Some(c) = cursor.at() {
        if in_string {
            splitter.push(c, line);
            cursor.advance();
            match c {
                '\\' => {
                    if let Some(escaped) = cursor.at() {
                        splitter.push(escaped, line);
                        cursor.advance();
                    }
                }
                '"' => in_string = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        let top_level = brace_depth == 0 && paren_depth == 0;

        match c {
            '"' => {
                in_string = true;
                code_since_boundary = true;
                splitter.push(c, line);
            }
            '/' if cursor.peek(1) == Some('/') => {
                while cursor.at().is_some_and(|c| c != '\n') {
                    cursor.advance();
                }
                continue;
            }
            '/' if cursor.peek(1) == Some('*') => {
                cursor.advance_n(2);
                while !cursor.at_eof() && !cursor.starts_with("*/") {
                    if cursor.at() == Some('\n') {
                        line += 1;
                        if !top_level {
                            splitter.push('\n', line);
                        }
                    }
                    cursor.advance();
                }
                cursor.advance_n(2);
                continue;
            }
            '{' => {
                brace_depth += 1;
                code_since_boundary = true;
                splitter.push(c, line);
            }
            '}' => {
                brace_depth = (brace_depth - 1).max(0);
                splitter.push(c, line);
                if brace_depth == 0 && paren_depth == 0 {
                    splitter.flush(line);
                    code_since_boundary = false;
                }
                terminated = true;
            }
            '(' => {
                paren_depth += 1;
                code_since_boundary = true;
                splitter.push(c, line);
            }
            ')' => {
                paren_depth = (paren_depth - 1).max(0);
                splitter.push(c, line);
            }
            '\n' if top_level => {
                if code_since_boundary && !terminated {
                    errors.push(Error::new(ErrorImpl::MissingSemicolon, line));
                    splitter.flush(line);
                }
                code_since_boundary = false;
                terminated = false;
                line += 1;
            }
            '\n' => {
                splitter.push(c, line);
                line += 1;
            }
            ';' if top_level => {
                splitter.flush(line);
                terminated = true;
                code_since_boundary = false;
            }
            _ => {
                if !c.is_whitespace() {
                    code_since_boundary = true;
                    terminated = false;
                }
                splitter.push(c, line);
            }
        }

        cursor.advance();
    }

    splitter.flush(line);

    debug!(
        "tokenized {} statement(s) starting at line {}",
        splitter.statements.len(),
        first_line
    );

    splitter.statements
}
