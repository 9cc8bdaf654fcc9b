use serde::Serialize;

use crate::lexer::tokens::Operator;

use super::{ast::Stmt, types::TypeNode};

/// One token of a scanned expression. Expressions are flat token lists;
/// operators sit between operands and are folded left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprToken {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Variable(AccessChain),
    Operator(Operator),
    Group(Vec<ExprToken>),
    Object(JsonLiteral),
    Array(JsonLiteral),
    FuncActivation {
        callee: AccessChain,
        args: Vec<Vec<ExprToken>>,
    },
    Func(Lambda),
    Await(Box<ExprToken>),
}

impl ExprToken {
    /// Everything except an operator produces a value.
    pub fn is_value(&self) -> bool {
        !matches!(self, ExprToken::Operator(_))
    }
}

/// `base.prop[index]...`, resolved one step at a time from the base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessChain {
    pub base: String,
    pub steps: Vec<AccessStep>,
}

impl AccessChain {
    pub fn simple(base: &str) -> AccessChain {
        AccessChain {
            base: base.to_string(),
            steps: vec![],
        }
    }

    /// The chain with its final step removed, and that step.
    pub fn split_last(&self) -> Option<(AccessChain, &AccessStep)> {
        let (last, rest) = self.steps.split_last()?;
        Some((
            AccessChain {
                base: self.base.clone(),
                steps: rest.to_vec(),
            },
            last,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AccessStep {
    Prop(String),
    Index(Vec<ExprToken>),
}

/// A `{...}` or `[...]` literal, kept as parsed JSON together with the
/// element type inferred from its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonLiteral {
    pub value: serde_json::Value,
    pub element_type: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub param_type: TypeNode,
}

/// `(a, b) => { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}
