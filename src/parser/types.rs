//! Parsing of type annotations such as `int`, `array<string>`,
//! `object<array<int>>` and `string | number`.

use crate::{ast::types::TypeNode, errors::errors::ErrorImpl, lexer::lexer::Cursor};

fn is_type_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn invalid(text: &str) -> ErrorImpl {
    ErrorImpl::InvalidType {
        type_: text.trim().to_string(),
    }
}

/// Parses a complete type annotation. Trailing text is an error.
pub fn parse_type(text: &str) -> Result<TypeNode, ErrorImpl> {
    let mut cursor = Cursor::new(text);
    let node = parse_union(&mut cursor).ok_or_else(|| invalid(text))?;

    cursor.skip_whitespace();
    if !cursor.at_eof() {
        return Err(invalid(text));
    }

    Ok(node)
}

fn parse_union(cursor: &mut Cursor) -> Option<TypeNode> {
    let mut types = vec![parse_single(cursor)?];

    loop {
        cursor.skip_whitespace();
        if cursor.at() != Some('|') {
            break;
        }
        cursor.advance();
        types.push(parse_single(cursor)?);
    }

    if types.len() == 1 {
        types.pop()
    } else {
        Some(TypeNode::Union { types })
    }
}

fn parse_single(cursor: &mut Cursor) -> Option<TypeNode> {
    cursor.skip_whitespace();

    let mut name = String::new();
    while let Some(c) = cursor.at().filter(|c| is_type_char(*c)) {
        name.push(c);
        cursor.advance();
    }
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let mut params = vec![];
    cursor.skip_whitespace();
    if cursor.at() == Some('<') {
        cursor.advance();
        loop {
            params.push(parse_union(cursor)?);
            cursor.skip_whitespace();
            match cursor.at() {
                Some(',') => cursor.advance(),
                Some('>') => {
                    cursor.advance();
                    break;
                }
                _ => return None,
            }
        }
    }

    Some(TypeNode::Named { name, params })
}
