//! Statement splitting for HuopaScript source.
//!
//! The tokenizer does not produce a token stream. It cuts the source into
//! statement strings, honoring string literals, nested braces and comments,
//! and leaves the finer scanning to the parser. It handles:
//!
//! - Semicolon and newline termination, with a diagnostic for missing `;`
//! - Brace-balanced blocks that become a single statement
//! - Line tracking so every statement knows where it started
//!
//! `tokens` holds the keyword and operator tables shared with the parser.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
