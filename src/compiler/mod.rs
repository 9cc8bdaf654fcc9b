//! Code generation module for the compiler.
//!
//! This module type-checks the AST and emits JavaScript in a single pass.
//! It handles:
//!
//! - Compilation of expressions and statements, with 32-bit integer wrapping
//! - Scopes, function hoisting and `async` detection
//! - Loading of import files and embedding their code
//! - The runtime prelude and the final output check

pub mod compiler;
pub mod expr;
pub mod imports;
pub mod output_check;
pub mod prelude;
pub mod stmt;
