//! Type rules shared by the code generator.
//!
//! This module holds the static half of semantic analysis:
//!
//! - Operator tables and the result type of unary and binary operations
//! - Built-in properties of `string`, `number`, `object` and `array`
//! - Assignability checks and refinement of declared container types
//! - The scope stack used to resolve identifiers
//!
//! The walk over the AST lives in the compiler, which type-checks and emits
//! each statement in a single pass.

pub mod lookups;
pub mod scope;
pub mod type_checker;

#[cfg(test)]
mod tests;
