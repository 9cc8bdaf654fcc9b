/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The statement node and its kinds
/// - expressions: Expression tokens and access chains
/// - statements: Payloads of the compound statement kinds
/// - types: Type annotations and assignability
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
