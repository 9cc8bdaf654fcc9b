//! Main compiler module.
//!
//! This module holds the `CompileContext` threaded through code generation
//! and assembles the final program: the async wrapper, embedded imports,
//! the runtime prelude and the compiled body.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        expressions::{AccessStep, ExprToken},
        statements::{ElseBranch, VarTarget},
        types::TypeNode,
    },
    config::CompileOptions,
    errors::errors::{Error, ErrorImpl},
    type_checker::scope::{ScopeStack, Symbol, SymbolKind},
};

use super::{
    imports::ImportedModule, output_check::check_output, prelude::render_prelude,
    stmt::gen_statement,
};

const INDENT: &str = "    ";

/// State of one `compile` call.
///
/// Every diagnostic is collected in `errors`; generation continues after an
/// error so that a single run reports as many problems as possible.
pub struct CompileContext<'a> {
    pub options: &'a CompileOptions,
    /// Imports in statement order, looked up by module name.
    pub imports: Vec<ImportedModule>,
    pub errors: Vec<Error>,
    pub scopes: ScopeStack,
    /// Declared return types of the enclosing functions, innermost last.
    pub functions: Vec<TypeNode>,
    /// Prelude helpers referenced by the generated code.
    pub used_prelude: BTreeSet<&'static str>,
    /// Current indentation level of emitted statements.
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutput {
    /// The generated JavaScript, empty whenever `errors` is not.
    pub code: String,
    pub errors: Vec<Error>,
}

impl<'a> CompileContext<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        CompileContext {
            options,
            imports: vec![],
            errors: vec![],
            scopes: ScopeStack::new(),
            functions: vec![],
            used_prelude: BTreeSet::new(),
            indent: 1,
        }
    }

    pub fn error(&mut self, error_impl: ErrorImpl, line: usize) {
        self.errors.push(Error::new(error_impl, line));
    }

    pub fn module(&self, name: &str) -> Option<&ImportedModule> {
        self.imports.iter().find(|m| m.module == name)
    }

    pub fn pad(&self) -> String {
        INDENT.repeat(self.indent)
    }

    /// Compiles `body` in a new frame, returning `{ ... }` with the closing
    /// brace at the current indentation.
    ///
    /// `params` are declared in the new frame before the body.
    pub fn block(&mut self, body: &[Stmt], params: Vec<Symbol>, line: usize) -> String {
        self.scopes.push_frame();
        for param in params {
            if self.scopes.lookup_current(&param.name).is_some() {
                self.error(
                    ErrorImpl::AlreadyDeclared {
                        name: param.name.clone(),
                    },
                    line,
                );
            }
            self.scopes.upsert(param);
        }

        self.indent += 1;
        let inner = compile_level(self, body, false);
        self.indent -= 1;
        self.scopes.pop_frame();

        format!("{{\n{}{}}}", inner, self.pad())
    }
}

/// Compiles a parsed program into JavaScript.
///
/// # Arguments
///
/// * `ast` - The top-level statements returned by the parser
/// * `options` - Import resolution and output check settings
///
/// # Returns
///
/// The generated code, or an empty string together with every diagnostic.
pub fn compile(ast: &[Stmt], options: &CompileOptions) -> CompileOutput {
    let mut ctx = CompileContext::new(options);
    let body = compile_level(&mut ctx, ast, true);

    if !ctx.errors.is_empty() {
        debug!("compilation produced {} error(s)", ctx.errors.len());
        return CompileOutput {
            code: String::new(),
            errors: ctx.errors,
        };
    }

    let code = assemble(&ctx, &body);

    if options.check_output {
        if let Err(error) = check_output(&code) {
            warn!("generated code failed the output check: {}", error);
            return CompileOutput {
                code: String::new(),
                errors: vec![error],
            };
        }
        info!("output check passed");
    }

    CompileOutput {
        code,
        errors: vec![],
    }
}

/// Compiles one block level. Functions declared at this level are registered
/// first so that statements above a declaration can call it.
pub fn compile_level(ctx: &mut CompileContext, stmts: &[Stmt], toplevel: bool) -> String {
    hoist_functions(ctx, stmts);

    let pad = ctx.pad();
    let mut out = String::new();
    for stmt in stmts {
        if let Some(code) = gen_statement(ctx, stmt, toplevel) {
            out.push_str(&pad);
            out.push_str(&code);
            out.push('\n');
        }
    }
    out
}

fn hoist_functions(ctx: &mut CompileContext, stmts: &[Stmt]) {
    for stmt in stmts {
        let StmtKind::Func(func) = &stmt.kind else {
            continue;
        };

        if ctx.scopes.lookup_current(&func.name).is_some() || ctx.module(&func.name).is_some() {
            ctx.error(
                ErrorImpl::AlreadyDeclared {
                    name: func.name.clone(),
                },
                stmt.line,
            );
            continue;
        }

        ctx.scopes.upsert(Symbol {
            name: func.name.clone(),
            kind: SymbolKind::Func {
                params: func.params.clone(),
                return_type: func.return_type.clone(),
                is_async: body_awaits(&func.body),
                hoisted: true,
            },
            constant: true,
        });
    }
}

/// Whether `await` appears in `body` outside of nested functions and
/// lambdas, which makes the enclosing function `async`.
pub fn body_awaits(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match &stmt.kind {
        StmtKind::Var(var) => {
            tokens_await(&var.value)
                || matches!(&var.target, VarTarget::Modify(chain) if steps_await(&chain.steps))
        }
        StmtKind::Expr(tokens) => tokens_await(tokens),
        StmtKind::Func(_) | StmtKind::Import { .. } => false,
        StmtKind::If(if_stmt) => {
            let mut current = Some(if_stmt);
            let mut found = false;
            while let Some(branch) = current {
                found |= tokens_await(&branch.condition) || body_awaits(&branch.body);
                current = match &branch.else_branch {
                    Some(ElseBranch::If { if_stmt, .. }) => Some(if_stmt.as_ref()),
                    Some(ElseBranch::Block(body)) => {
                        found |= body_awaits(body);
                        None
                    }
                    None => None,
                };
            }
            found
        }
        StmtKind::While(while_stmt) => {
            tokens_await(&while_stmt.condition) || body_awaits(&while_stmt.body)
        }
        StmtKind::FuncActivation { callee, args } => {
            steps_await(&callee.steps) || args.iter().any(|arg| tokens_await(arg))
        }
        StmtKind::Return(value) => value.as_deref().is_some_and(tokens_await),
    })
}

fn tokens_await(tokens: &[ExprToken]) -> bool {
    tokens.iter().any(|token| match token {
        ExprToken::Await(_) => true,
        ExprToken::Group(inner) => tokens_await(inner),
        ExprToken::Variable(chain) => steps_await(&chain.steps),
        ExprToken::FuncActivation { callee, args } => {
            steps_await(&callee.steps) || args.iter().any(|arg| tokens_await(arg))
        }
        _ => false,
    })
}

fn steps_await(steps: &[AccessStep]) -> bool {
    steps.iter().any(|step| match step {
        AccessStep::Index(index) => tokens_await(index),
        AccessStep::Prop(_) => false,
    })
}

fn assemble(ctx: &CompileContext, body: &str) -> String {
    let mut out = String::from("(async () => {\n// Embedded imports\n");

    for import in &ctx.imports {
        out.push_str(&format!("const {} = (() => {{\n", import.module));
        let code = import.code.trim();
        if !code.is_empty() {
            out.push_str(code);
            out.push('\n');
        }
        out.push_str(&format!("return {};\n}})();\n", import.exports()));
    }

    out.push_str(&render_prelude(&ctx.used_prelude));
    out.push_str(body);
    out.push_str("})();\n");
    out
}
