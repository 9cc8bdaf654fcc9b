#![allow(clippy::module_inception)]

use std::path::Path;

use crate::{
    compiler::compiler::{compile, CompileOutput},
    config::CompileOptions,
    errors::errors::{Error, ErrorCategory, ErrorTip},
    parser::parser::parse,
};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Parses and compiles a complete source file.
///
/// Parse errors stop the pipeline before code generation, so the returned
/// diagnostics are either all parse errors or all compile errors.
pub fn compile_source(source: &str, options: &CompileOptions) -> CompileOutput {
    let parsed = parse(source);
    if !parsed.errors.is_empty() {
        return CompileOutput {
            code: String::new(),
            errors: parsed.errors,
        };
    }

    compile(&parsed.ast, options)
}

/// Returns the text of the 1-based `line`, without its line break.
pub fn get_line(source: &str, line: usize) -> Option<&str> {
    source
        .split_inclusive('\n')
        .nth(line.checked_sub(1)?)
        .map(|text| text.trim_end_matches(['\n', '\r']))
}


/// Renders a diagnostic with the offending source line.
///
/// ```text
/// Error: MissingSemicolon (End the statement with `;`)
/// -> demo.hsc
///   |
/// 2 | int b = 2
///   | ^^^^^^^^^
///   = SyntaxError: Expected semicolon
/// ```
pub fn format_error(error: &Error, source: &str, file: &Path) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }

    // Output check lines point into the generated code, not the source.
    if error.get_category() == ErrorCategory::OutputCheckError {
        out.push_str(&format!(
            "-> {} (generated code, line {})\n",
            file.display(),
            error.get_line()
        ));
        out.push_str(&format!("   = {}: {}\n", error.get_category(), error.get_message()));
        return out;
    }

    out.push_str(&format!("-> {}\n", file.display()));

    let line_string = error.get_line().to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    if let Some(line_text) = get_line(source, error.get_line()) {
        let line_text = line_text.trim();
        out.push_str(&format!("{} | {}\n", line_string, line_text));

        let arrows = line_text.chars().count().max(1);
        out.push_str(&format!("{:>padding$} {}\n", "|", "^".repeat(arrows)));
    }

    out.push_str(&format!(
        "{:>padding$} {}: {}\n",
        "=",
        error.get_category(),
        error.get_message()
    ));
    out
}
