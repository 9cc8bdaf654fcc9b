use crate::{
    ast::{
        expressions::{AccessChain, AccessStep, ExprToken, Lambda},
        types::TypeNode,
    },
    errors::errors::ErrorImpl,
    lexer::tokens::Operator,
    type_checker::{
        lookups::Emit,
        scope::{Symbol, SymbolKind},
        type_checker::{
            apply_binary, apply_unary, check_arguments, check_assignment, check_type_name,
            index_type, resolve_member,
        },
    },
};

use super::compiler::{body_awaits, CompileContext};

/// A generated JavaScript expression and its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub ty: TypeNode,
    pub code: String,
}

impl TypedExpr {
    fn new(ty: TypeNode, code: String) -> Self {
        TypedExpr { ty, code }
    }
}

/// What a call expression invokes.
enum CallTarget {
    /// A callee with a known signature.
    Checked {
        code: String,
        /// Passed as the first argument, for prelude helpers.
        receiver: Option<String>,
        params: Vec<TypeNode>,
        variadic: bool,
        returns: TypeNode,
        is_async: bool,
    },
    /// A `func` or `any` value; arguments are not checked.
    Dynamic { code: String },
}

/// Type-checks and emits a flat expression.
///
/// There is no operator precedence: operators apply strictly left to right,
/// and every binary operation is parenthesized so the emitted JavaScript
/// evaluates in the same order.
pub fn gen_expression(ctx: &mut CompileContext, tokens: &[ExprToken], line: usize) -> Option<TypedExpr> {
    let mut iter = tokens.iter();
    let mut acc = gen_operand(ctx, &mut iter, line)?;

    while let Some(token) = iter.next() {
        let op = match token {
            ExprToken::Operator(op) if *op != Operator::Not && !op.is_assignment() => *op,
            ExprToken::Operator(op) => {
                ctx.error(
                    ErrorImpl::UnexpectedToken {
                        token: op.to_string(),
                    },
                    line,
                );
                return None;
            }
            _ => {
                ctx.error(
                    ErrorImpl::UnexpectedToken {
                        token: String::from("value"),
                    },
                    line,
                );
                return None;
            }
        };

        let right = gen_operand(ctx, &mut iter, line)?;
        let ty = match apply_binary(op, &acc.ty, &right.ty) {
            Ok(ty) => ty,
            Err(e) => {
                ctx.error(e, line);
                return None;
            }
        };
        acc = TypedExpr::new(ty, format!("({} {} {})", acc.code, op.to_js(), right.code));
    }

    Some(acc)
}

/// A value with any prefix operators in front of it.
fn gen_operand(
    ctx: &mut CompileContext,
    iter: &mut std::slice::Iter<ExprToken>,
    line: usize,
) -> Option<TypedExpr> {
    let mut prefix = vec![];
    let mut value = loop {
        match iter.next() {
            Some(ExprToken::Operator(op)) if op.is_unary() => prefix.push(*op),
            Some(ExprToken::Operator(op)) => {
                ctx.error(
                    ErrorImpl::UnexpectedToken {
                        token: op.to_string(),
                    },
                    line,
                );
                return None;
            }
            Some(token) => break gen_value(ctx, token, line)?,
            None => {
                ctx.error(ErrorImpl::UnexpectedEndOfExpression, line);
                return None;
            }
        }
    };

    for op in prefix.into_iter().rev() {
        let ty = match apply_unary(op, &value.ty) {
            Ok(ty) => ty,
            Err(e) => {
                ctx.error(e, line);
                return None;
            }
        };
        let code = match op {
            Operator::Not => format!("!{}", value.code),
            _ => format!("(-{})", value.code),
        };
        value = TypedExpr::new(ty, code);
    }

    Some(value)
}

pub fn gen_value(ctx: &mut CompileContext, token: &ExprToken, line: usize) -> Option<TypedExpr> {
    match token {
        ExprToken::Number(n) => Some(TypedExpr::new(TypeNode::number(), format_number(*n))),
        ExprToken::String(s) => Some(TypedExpr::new(TypeNode::string(), js_string(s))),
        ExprToken::Bool(b) => Some(TypedExpr::new(TypeNode::boolean(), b.to_string())),
        ExprToken::Null => Some(TypedExpr::new(TypeNode::any(), String::from("null"))),
        ExprToken::Object(literal) => Some(TypedExpr::new(
            TypeNode::object_of(literal.element_type.clone()),
            format!("({})", literal.value),
        )),
        ExprToken::Array(literal) => Some(TypedExpr::new(
            TypeNode::array_of(literal.element_type.clone()),
            literal.value.to_string(),
        )),
        ExprToken::Group(inner) => {
            let value = gen_expression(ctx, inner, line)?;
            Some(TypedExpr::new(value.ty, format!("({})", value.code)))
        }
        ExprToken::Variable(chain) => resolve_chain(ctx, chain, line),
        ExprToken::FuncActivation { callee, args } => gen_call(ctx, callee, args, line, false),
        ExprToken::Func(lambda) => Some(gen_lambda(ctx, lambda, line)),
        ExprToken::Await(inner) => {
            let value = match inner.as_ref() {
                ExprToken::FuncActivation { callee, args } => gen_call(ctx, callee, args, line, true)?,
                other => gen_value(ctx, other, line)?,
            };
            Some(TypedExpr::new(value.ty, format!("(await {})", value.code)))
        }
        ExprToken::Operator(op) => {
            ctx.error(
                ErrorImpl::UnexpectedToken {
                    token: op.to_string(),
                },
                line,
            );
            None
        }
    }
}

/// Resolves `base.prop[index]...` to its type and code.
pub fn resolve_chain(ctx: &mut CompileContext, chain: &AccessChain, line: usize) -> Option<TypedExpr> {
    let (mut current, consumed) = resolve_base(ctx, chain, line)?;

    for step in &chain.steps[consumed..] {
        current = match step {
            AccessStep::Prop(name) => match resolve_member(&current.ty, name, false) {
                Ok(member) => TypedExpr::new(member.type_, format!("{}.{}", current.code, name)),
                Err(e) => {
                    ctx.error(e, line);
                    return None;
                }
            },
            AccessStep::Index(index) => {
                let (element, key) = match index_type(&current.ty) {
                    Ok(types) => types,
                    Err(e) => {
                        ctx.error(e, line);
                        return None;
                    }
                };
                let index = gen_expression(ctx, index, line)?;
                if let Err(e) = check_assignment(&key, &index.ty) {
                    ctx.error(e, line);
                }
                TypedExpr::new(element, format!("{}[{}]", current.code, index.code))
            }
        };
    }

    Some(current)
}

/// The value of the chain's base and how many steps it consumed. A module
/// base consumes its member step.
fn resolve_base(ctx: &mut CompileContext, chain: &AccessChain, line: usize) -> Option<(TypedExpr, usize)> {
    if let Some(symbol) = ctx.scopes.lookup(&chain.base) {
        return Some((TypedExpr::new(symbol.value_type(), chain.base.clone()), 0));
    }

    let Some(module) = ctx.module(&chain.base) else {
        ctx.error(
            ErrorImpl::VariableNotDeclared {
                name: chain.base.clone(),
            },
            line,
        );
        return None;
    };

    let Some(AccessStep::Prop(member)) = chain.steps.first() else {
        return Some((TypedExpr::new(TypeNode::any(), chain.base.clone()), 0));
    };

    let ty = if let Some(property) = module.property(member) {
        Some(property.type_.clone())
    } else {
        module.function(member).map(|_| TypeNode::func())
    };

    match ty {
        Some(ty) => Some((TypedExpr::new(ty, format!("{}.{}", chain.base, member)), 1)),
        None => {
            ctx.error(
                ErrorImpl::UnknownModuleMember {
                    module: chain.base.clone(),
                    member: member.clone(),
                },
                line,
            );
            None
        }
    }
}

/// Type-checks and emits a call.
///
/// # Arguments
///
/// * `callee` - The called chain, e.g. `add`, `io.print` or `s.split`
/// * `args` - One token list per argument
/// * `awaited` - Whether the call is the operand of `await`. An async callee
///   that is not awaited evaluates to a promise, typed `any`.
pub fn gen_call(
    ctx: &mut CompileContext,
    callee: &AccessChain,
    args: &[Vec<ExprToken>],
    line: usize,
    awaited: bool,
) -> Option<TypedExpr> {
    let mut values = vec![];
    let mut failed = false;
    for arg in args {
        match gen_expression(ctx, arg, line) {
            Some(value) => values.push(value),
            None => failed = true,
        }
    }

    let target = call_target(ctx, callee, line)?;
    if failed {
        return None;
    }

    let mut arg_code: Vec<String> = values.iter().map(|v| v.code.clone()).collect();

    match target {
        CallTarget::Dynamic { code } => Some(TypedExpr::new(
            TypeNode::any(),
            format!("{}({})", code, arg_code.join(", ")),
        )),
        CallTarget::Checked {
            code,
            receiver,
            params,
            variadic,
            returns,
            is_async,
        } => {
            let arg_types: Vec<TypeNode> = values.into_iter().map(|v| v.ty).collect();
            for error in check_arguments(&params, variadic, &arg_types) {
                ctx.error(error, line);
            }

            if let Some(receiver) = receiver {
                arg_code.insert(0, receiver);
            }
            let ty = if is_async && !awaited {
                TypeNode::any()
            } else {
                returns
            };
            Some(TypedExpr::new(ty, format!("{}({})", code, arg_code.join(", "))))
        }
    }
}

fn call_target(ctx: &mut CompileContext, callee: &AccessChain, line: usize) -> Option<CallTarget> {
    if callee.steps.is_empty() {
        return local_call_target(ctx, &callee.base, line);
    }

    if ctx.scopes.lookup(&callee.base).is_none() && callee.steps.len() == 1 {
        if let Some(target) = module_call_target(ctx, callee, line) {
            return target;
        }
    }

    let Some((receiver_chain, last)) = callee.split_last() else {
        return None;
    };

    let AccessStep::Prop(name) = last else {
        let value = resolve_chain(ctx, callee, line)?;
        return dynamic_or_not_callable(ctx, value, &callee.base, line);
    };

    let receiver = resolve_chain(ctx, &receiver_chain, line)?;
    let member = match resolve_member(&receiver.ty, name, true) {
        Ok(member) => member,
        Err(e) => {
            ctx.error(e, line);
            return None;
        }
    };
    let code = format!("{}.{}", receiver.code, name);

    if member.dynamic {
        return dynamic_or_not_callable(ctx, TypedExpr::new(member.type_, code), name, line);
    }

    Some(match member.emit {
        Emit::Member => CallTarget::Checked {
            code,
            receiver: None,
            params: member.params,
            variadic: member.variadic,
            returns: member.type_,
            is_async: false,
        },
        Emit::Prelude(helper) => {
            ctx.used_prelude.insert(helper);
            CallTarget::Checked {
                code: helper.to_string(),
                receiver: Some(receiver.code),
                params: member.params,
                variadic: member.variadic,
                returns: member.type_,
                is_async: false,
            }
        }
    })
}

fn local_call_target(ctx: &mut CompileContext, name: &str, line: usize) -> Option<CallTarget> {
    let Some(symbol) = ctx.scopes.lookup(name).cloned() else {
        let error = if ctx.module(name).is_some() {
            ErrorImpl::NotCallable {
                name: name.to_string(),
            }
        } else {
            ErrorImpl::FunctionNotDeclared {
                name: name.to_string(),
            }
        };
        ctx.error(error, line);
        return None;
    };

    match symbol.kind {
        SymbolKind::Func {
            params,
            return_type,
            is_async,
            ..
        } => Some(CallTarget::Checked {
            code: name.to_string(),
            receiver: None,
            params: params.into_iter().map(|p| p.param_type).collect(),
            variadic: false,
            returns: return_type,
            is_async,
        }),
        SymbolKind::Var { decl_type } => {
            dynamic_or_not_callable(ctx, TypedExpr::new(decl_type, name.to_string()), name, line)
        }
    }
}

/// `module.member(...)`. Returns `None` when the base is not a module.
fn module_call_target(
    ctx: &mut CompileContext,
    callee: &AccessChain,
    line: usize,
) -> Option<Option<CallTarget>> {
    let module = ctx.module(&callee.base)?;
    let Some(AccessStep::Prop(member)) = callee.steps.first() else {
        return None;
    };
    let code = format!("{}.{}", callee.base, member);

    if let Some(function) = module.function(member) {
        return Some(Some(CallTarget::Checked {
            code,
            receiver: None,
            params: function.params.clone(),
            variadic: function.variadic,
            returns: function.returns.clone(),
            is_async: function.is_async,
        }));
    }

    if let Some(property) = module.property(member) {
        let value = TypedExpr::new(property.type_.clone(), code.clone());
        return Some(dynamic_or_not_callable(ctx, value, &code, line));
    }

    ctx.error(
        ErrorImpl::UnknownModuleMember {
            module: callee.base.clone(),
            member: member.clone(),
        },
        line,
    );
    Some(None)
}

fn dynamic_or_not_callable(
    ctx: &mut CompileContext,
    value: TypedExpr,
    name: &str,
    line: usize,
) -> Option<CallTarget> {
    match value.ty.category().as_str() {
        "func" | "any" => Some(CallTarget::Dynamic { code: value.code }),
        _ => {
            ctx.error(
                ErrorImpl::NotCallable {
                    name: name.to_string(),
                },
                line,
            );
            None
        }
    }
}

fn gen_lambda(ctx: &mut CompileContext, lambda: &Lambda, line: usize) -> TypedExpr {
    let mut params = vec![];
    for param in &lambda.params {
        if let Err(e) = check_type_name(&param.param_type) {
            ctx.error(e, line);
        }
        params.push(Symbol::var(&param.name, param.param_type.clone(), false));
    }

    ctx.functions.push(TypeNode::any());
    let body = ctx.block(&lambda.body, params, line);
    ctx.functions.pop();

    let names: Vec<&str> = lambda.params.iter().map(|p| p.name.as_str()).collect();
    let prefix = if body_awaits(&lambda.body) { "async " } else { "" };
    TypedExpr::new(
        TypeNode::func(),
        format!("{}({}) => {}", prefix, names.join(", "), body),
    )
}

/// Formats a number literal the way JavaScript reads it back.
pub fn format_number(n: f64) -> String {
    n.to_string()
}

/// A double-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Applies 32-bit truncation for `int` and `uint` targets.
pub fn wrap_integer(target: &TypeNode, code: &str) -> String {
    if target.is_int() {
        format!("(({}) | 0)", code)
    } else if target.is_uint() {
        format!("((({}) | 0) >>> 0)", code)
    } else {
        code.to_string()
    }
}
