use serde::Serialize;

use super::{
    expressions::{AccessChain, ExprToken},
    statements::{FuncStmt, IfStmt, VarStmt, WhileStmt},
};

/// A parsed statement and the 1-based source line it starts on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub line: usize,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Stmt { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Var(VarStmt),
    Expr(Vec<ExprToken>),
    Func(FuncStmt),
    If(IfStmt),
    While(WhileStmt),
    /// A statement consisting of a single call.
    FuncActivation {
        callee: AccessChain,
        args: Vec<Vec<ExprToken>>,
    },
    Import {
        from: String,
    },
    Return(Option<Vec<ExprToken>>),
}
