use serde::Serialize;

use crate::lexer::tokens::Operator;

use super::{
    ast::Stmt,
    expressions::{AccessChain, ExprToken, Param},
    types::TypeNode,
};

/// What a variable statement writes to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VarTarget {
    /// `<type> <name> = ...`
    Declare { name: String, decl_type: TypeNode },
    /// `a.b[c] = ...`, `a += ...`
    Modify(AccessChain),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarStmt {
    pub target: VarTarget,
    pub op: Operator,
    pub value: Vec<ExprToken>,
    pub constant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncStmt {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeNode,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub condition: Vec<ExprToken>,
    pub body: Vec<Stmt>,
    pub else_branch: Option<ElseBranch>,
}

impl IfStmt {
    /// Attaches an `else` to the last `if` of an `else if` chain. Returns the
    /// branch back if the chain already ends in a plain `else`.
    pub fn attach_else(&mut self, branch: ElseBranch) -> Result<(), ElseBranch> {
        match &mut self.else_branch {
            None => {
                self.else_branch = Some(branch);
                Ok(())
            }
            Some(ElseBranch::If { if_stmt, .. }) => if_stmt.attach_else(branch),
            Some(ElseBranch::Block(_)) => Err(branch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElseBranch {
    Block(Vec<Stmt>),
    /// `else if`, with the line the nested `if` was written on.
    If { line: usize, if_stmt: Box<IfStmt> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: Vec<ExprToken>,
    pub body: Vec<Stmt>,
}
