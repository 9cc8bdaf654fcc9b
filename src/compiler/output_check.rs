//! A syntax check over generated JavaScript.
//!
//! The assembled output is parsed as a classic script. Embedded import code
//! is part of that text, so a broken import surfaces here as well.

use log::debug;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::errors::errors::{Error, ErrorImpl};

/// Parses `code`, reporting the first syntax error with its line in the
/// output.
pub fn check_output(code: &str) -> Result<(), Error> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(false);
    let parsed = Parser::new(&allocator, code, source_type).parse();

    if let Some(error) = parsed.errors.first() {
        debug!("output check reported {} error(s)", parsed.errors.len());
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset())
            .unwrap_or(code.len());

        return Err(Error::new(
            ErrorImpl::OutputCheck {
                message: error.message.to_string(),
            },
            line_of(code, offset),
        ));
    }

    if parsed.panicked {
        return Err(Error::new(
            ErrorImpl::OutputCheck {
                message: String::from("Unexpected end of input"),
            },
            line_of(code, code.len()),
        ));
    }

    Ok(())
}

/// 1-based line of a byte offset.
fn line_of(code: &str, offset: usize) -> usize {
    let end = offset.min(code.len());
    code.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
