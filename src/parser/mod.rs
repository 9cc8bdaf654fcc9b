//! Parser module for building the Abstract Syntax Tree (AST).
//!
//! The parser turns the tokenizer's statement strings into `Stmt` nodes.
//! It handles:
//!
//! - Keyword statements (`func`, `if`/`else`, `while`, `return`, `const`, `import`)
//! - Declarations and modifications, told apart by the shape of the left side
//! - Expression scanning into flat token lists
//! - Type annotations with generic parameters and unions
//!
//! Blocks are re-tokenized with their starting line so diagnostics inside
//! nested bodies point at the right place.

pub mod expr;
pub mod parser;
pub mod stmt;
pub mod types;
