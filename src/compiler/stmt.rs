use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        expressions::{AccessChain, AccessStep, ExprToken},
        statements::{ElseBranch, FuncStmt, IfStmt, VarStmt, VarTarget, WhileStmt},
        types::TypeNode,
    },
    errors::errors::ErrorImpl,
    type_checker::{
        scope::{Symbol, SymbolKind},
        type_checker::{apply_binary, check_assignment, check_type_name, declared_type},
    },
};

use super::{
    compiler::{body_awaits, CompileContext},
    expr::{gen_call, gen_expression, resolve_chain, wrap_integer},
    imports::load_module,
};

/// Type-checks and emits one statement. Returns `None` for statements that
/// produce no code, or that failed to compile.
pub fn gen_statement(ctx: &mut CompileContext, stmt: &Stmt, toplevel: bool) -> Option<String> {
    let line = stmt.line;
    match &stmt.kind {
        StmtKind::Var(var) => match &var.target {
            VarTarget::Declare { name, decl_type } => gen_declaration(ctx, var, name, decl_type, line),
            VarTarget::Modify(chain) => gen_modification(ctx, var, chain, line),
        },
        StmtKind::Expr(tokens) => {
            let value = gen_expression(ctx, tokens, line)?;
            Some(format!("{};", value.code))
        }
        StmtKind::FuncActivation { callee, args } => {
            let value = gen_call(ctx, callee, args, line, false)?;
            Some(format!("{};", value.code))
        }
        StmtKind::Func(func) => Some(gen_function(ctx, func, line)),
        StmtKind::If(if_stmt) => Some(gen_if(ctx, if_stmt, line)),
        StmtKind::While(while_stmt) => Some(gen_while(ctx, while_stmt, line)),
        StmtKind::Import { from } => {
            gen_import(ctx, from, line, toplevel);
            None
        }
        StmtKind::Return(value) => gen_return(ctx, value.as_deref(), line),
    }
}

fn gen_declaration(
    ctx: &mut CompileContext,
    var: &VarStmt,
    name: &str,
    decl_type: &TypeNode,
    line: usize,
) -> Option<String> {
    if decl_type.is_null() {
        ctx.error(ErrorImpl::NullDeclaration, line);
        return None;
    }
    if let Err(e) = check_type_name(decl_type) {
        ctx.error(e, line);
        return None;
    }

    let redeclared = ctx.scopes.lookup_current(name).is_some() || ctx.module(name).is_some();
    if redeclared {
        ctx.error(
            ErrorImpl::AlreadyDeclared {
                name: name.to_string(),
            },
            line,
        );
    }

    let value = gen_expression(ctx, &var.value, line);
    let symbol_type = match &value {
        Some(value) => {
            if let Err(e) = check_assignment(decl_type, &value.ty) {
                ctx.error(e, line);
            }
            declared_type(decl_type, &value.ty)
        }
        None => decl_type.clone(),
    };

    if !redeclared {
        ctx.scopes.upsert(Symbol::var(name, symbol_type, var.constant));
    }

    let value = value?;
    let keyword = if var.constant { "const" } else { "let" };
    Some(format!(
        "{} {} = {};",
        keyword,
        name,
        wrap_integer(decl_type, &value.code)
    ))
}

fn gen_modification(
    ctx: &mut CompileContext,
    var: &VarStmt,
    chain: &AccessChain,
    line: usize,
) -> Option<String> {
    // Integer targets, bare or indexed, are truncated after every write.
    let mut integer_target = None;

    match ctx.scopes.lookup(&chain.base).cloned() {
        Some(symbol) => match symbol.kind {
            SymbolKind::Func { .. } => {
                ctx.error(
                    ErrorImpl::ConstantModified {
                        name: chain.base.clone(),
                    },
                    line,
                );
                return None;
            }
            SymbolKind::Var { decl_type } if chain.steps.is_empty() => {
                if symbol.constant {
                    ctx.error(
                        ErrorImpl::ConstantModified {
                            name: chain.base.clone(),
                        },
                        line,
                    );
                    return None;
                }
                if decl_type.is_int() || decl_type.is_uint() {
                    integer_target = Some(decl_type);
                }
            }
            SymbolKind::Var { decl_type } => {
                integer_target = indexed_element(&decl_type, &chain.steps)
                    .filter(|element| element.is_int() || element.is_uint());
            }
        },
        None if ctx.module(&chain.base).is_some() && chain.steps.is_empty() => {
            ctx.error(
                ErrorImpl::ConstantModified {
                    name: chain.base.clone(),
                },
                line,
            );
            return None;
        }
        None => {}
    }

    let target = resolve_chain(ctx, chain, line);
    let value = gen_expression(ctx, &var.value, line);
    let (target, value) = (target?, value?);

    let result = match var.op.compound_base() {
        Some(_) => match apply_binary(var.op, &target.ty, &value.ty) {
            Ok(result) => result,
            Err(e) => {
                ctx.error(e, line);
                return None;
            }
        },
        None => value.ty.clone(),
    };
    if let Err(e) = check_assignment(&target.ty, &result) {
        ctx.error(e, line);
    }

    Some(match (integer_target, var.op.compound_base()) {
        (Some(decl_type), Some(base)) => format!(
            "{} = {};",
            target.code,
            wrap_integer(
                &decl_type,
                &format!("({} {} ({}))", target.code, base.to_js(), value.code)
            )
        ),
        (Some(decl_type), None) => format!(
            "{} = {};",
            target.code,
            wrap_integer(&decl_type, &value.code)
        ),
        (None, _) => format!("{} {} {};", target.code, var.op.to_js(), value.code),
    })
}

/// The annotated element type reached by indexing into `decl_type`. Element
/// annotations are not normalized, so `array<int>` still yields `int`.
fn indexed_element(decl_type: &TypeNode, steps: &[AccessStep]) -> Option<TypeNode> {
    steps.iter().try_fold(decl_type.clone(), |current, step| match (step, current) {
        (AccessStep::Index(_), TypeNode::Named { name, mut params })
            if (name == "array" || name == "object") && params.len() == 1 =>
        {
            params.pop()
        }
        _ => None,
    })
}

fn gen_function(ctx: &mut CompileContext, func: &FuncStmt, line: usize) -> String {
    if func.return_type.is_null() {
        ctx.error(ErrorImpl::NullDeclaration, line);
    } else if let Err(e) = check_type_name(&func.return_type) {
        ctx.error(e, line);
    }

    // The first declaration of this name was registered while hoisting.
    if let Some(symbol) = ctx.scopes.lookup_current(&func.name).cloned() {
        if let SymbolKind::Func {
            params,
            return_type,
            is_async,
            hoisted: true,
        } = symbol.kind
        {
            ctx.scopes.upsert(Symbol {
                name: symbol.name,
                kind: SymbolKind::Func {
                    params,
                    return_type,
                    is_async,
                    hoisted: false,
                },
                constant: symbol.constant,
            });
        }
    }

    let mut params = vec![];
    for param in &func.params {
        if let Err(e) = check_type_name(&param.param_type) {
            ctx.error(e, line);
        }
        params.push(Symbol::var(&param.name, param.param_type.clone(), false));
    }

    ctx.functions.push(func.return_type.clone());
    let body = ctx.block(&func.body, params, line);
    ctx.functions.pop();

    let names: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
    let prefix = if body_awaits(&func.body) { "async " } else { "" };
    format!(
        "{}function {}({}) {}",
        prefix,
        func.name,
        names.join(", "),
        body
    )
}

/// Emits a condition, reporting non-boolean types for `statement`.
fn gen_condition(ctx: &mut CompileContext, tokens: &[ExprToken], statement: &str, line: usize) -> String {
    let Some(condition) = gen_expression(ctx, tokens, line) else {
        return String::from("false");
    };

    let category = condition.ty.category();
    if category != "boolean" && category != "any" {
        ctx.error(
            ErrorImpl::InvalidCondition {
                statement: statement.to_string(),
            },
            line,
        );
    }
    condition.code
}

fn gen_if(ctx: &mut CompileContext, if_stmt: &IfStmt, line: usize) -> String {
    let condition = gen_condition(ctx, &if_stmt.condition, "If", line);
    let body = ctx.block(&if_stmt.body, vec![], line);
    let mut out = format!("if ({}) {}", condition, body);

    match &if_stmt.else_branch {
        Some(ElseBranch::Block(else_body)) => {
            let else_body = ctx.block(else_body, vec![], line);
            out.push_str(&format!(" else {}", else_body));
        }
        Some(ElseBranch::If { line, if_stmt }) => {
            out.push_str(&format!(" else {}", gen_if(ctx, if_stmt, *line)));
        }
        None => {}
    }

    out
}

fn gen_while(ctx: &mut CompileContext, while_stmt: &WhileStmt, line: usize) -> String {
    let condition = gen_condition(ctx, &while_stmt.condition, "While", line);
    let body = ctx.block(&while_stmt.body, vec![], line);
    format!("while ({}) {}", condition, body)
}

fn gen_import(ctx: &mut CompileContext, from: &str, line: usize, toplevel: bool) {
    if !toplevel {
        ctx.error(ErrorImpl::NestedImport, line);
        return;
    }
    if ctx.imports.iter().any(|import| import.path == from) {
        ctx.error(
            ErrorImpl::DuplicateImport {
                path: from.to_string(),
            },
            line,
        );
        return;
    }

    let module = match load_module(from, ctx.options) {
        Ok(module) => module,
        Err(e) => {
            ctx.error(e, line);
            return;
        }
    };

    if ctx.module(&module.module).is_some() || ctx.scopes.lookup(&module.module).is_some() {
        ctx.error(
            ErrorImpl::DuplicateModule {
                module: module.module,
            },
            line,
        );
        return;
    }

    ctx.imports.push(module);
}

fn gen_return(ctx: &mut CompileContext, value: Option<&[ExprToken]>, line: usize) -> Option<String> {
    let Some(expected) = ctx.functions.last().cloned() else {
        ctx.error(ErrorImpl::ReturnOutsideFunction, line);
        return None;
    };

    let Some(tokens) = value else {
        if !expected.is_void() && !expected.is_any() {
            ctx.error(
                ErrorImpl::MissingReturnValue {
                    expected: expected.to_string(),
                },
                line,
            );
        }
        return Some(String::from("return;"));
    };

    let value = gen_expression(ctx, tokens, line)?;
    if expected.is_void() {
        ctx.error(
            ErrorImpl::TypeMismatch {
                expected: expected.to_string(),
                received: value.ty.to_string(),
            },
            line,
        );
    } else if let Err(e) = check_assignment(&expected, &value.ty) {
        ctx.error(e, line);
    }

    Some(format!("return {};", wrap_integer(&expected, &value.code)))
}
