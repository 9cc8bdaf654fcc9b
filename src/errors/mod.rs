//! Diagnostics reported by the compiler.
//!
//! Every phase (tokenizer, parser, code generator, output check) pushes
//! `Error` values into a shared list instead of stopping at the first
//! problem. An error knows its source line, its category and an optional
//! tip for the user.

pub mod errors;
