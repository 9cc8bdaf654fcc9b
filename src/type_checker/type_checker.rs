use crate::{
    ast::types::TypeNode,
    errors::errors::ErrorImpl,
    lexer::tokens::Operator,
    parser::types::parse_type,
};

use super::lookups::{
    operator_result, property, uniform_result, Emit, BINARY_OPERATOR_TYPES, UNARY_OPERATOR_TYPES,
};

const KNOWN_TYPES: &[&str] = &[
    "number", "int", "uint", "float", "string", "bool", "boolean", "array", "object", "func",
    "any", "void", "null",
];

/// Rejects annotations naming a type that does not exist.
pub fn check_type_name(type_: &TypeNode) -> Result<(), ErrorImpl> {
    match type_ {
        TypeNode::Named { name, params } => {
            if !KNOWN_TYPES.contains(&name.as_str()) {
                return Err(ErrorImpl::InvalidType {
                    type_: type_.to_string(),
                });
            }
            params.iter().try_for_each(check_type_name)
        }
        TypeNode::Union { types } => types.iter().try_for_each(check_type_name),
    }
}

/// A resolved property or method of a receiver type, with the element type
/// already substituted for `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub type_: TypeNode,
    pub method: bool,
    pub params: Vec<TypeNode>,
    pub variadic: bool,
    pub emit: Emit,
    /// Unchecked access on `any`, or a plain member of an `object<T>`.
    pub dynamic: bool,
}

impl Member {
    fn dynamic(type_: TypeNode) -> Self {
        Member {
            type_,
            method: false,
            params: vec![],
            variadic: false,
            emit: Emit::Member,
            dynamic: true,
        }
    }
}

/// Result type of `left op right`.
pub fn apply_binary(op: Operator, left: &TypeNode, right: &TypeNode) -> Result<TypeNode, ErrorImpl> {
    let left_category = left.category();
    let right_category = right.category();
    let mismatch = || ErrorImpl::OperatorMismatch {
        operator: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    };

    let accepts = |category: &str| {
        category == "any" || operator_result(&BINARY_OPERATOR_TYPES, op, category).is_some()
    };
    if !accepts(&left_category) || !accepts(&right_category) {
        return Err(mismatch());
    }

    if left_category == "any" || right_category == "any" {
        let result = uniform_result(&BINARY_OPERATOR_TYPES, op).unwrap_or("any");
        return Ok(TypeNode::named(result));
    }

    if matches!(op, Operator::Add | Operator::AddAssign)
        && (left_category == "string" || right_category == "string")
    {
        return Ok(TypeNode::string());
    }

    match operator_result(&BINARY_OPERATOR_TYPES, op, &left_category) {
        Some(result) => Ok(TypeNode::named(result)),
        None => Err(mismatch()),
    }
}

/// Result type of a prefix operator applied to `operand`.
pub fn apply_unary(op: Operator, operand: &TypeNode) -> Result<TypeNode, ErrorImpl> {
    let category = operand.category();
    let result = if category == "any" {
        uniform_result(&UNARY_OPERATOR_TYPES, op).or(Some("any"))
    } else {
        operator_result(&UNARY_OPERATOR_TYPES, op, &category)
    };

    result
        .map(TypeNode::named)
        .ok_or_else(|| ErrorImpl::UnaryOperatorMismatch {
            operator: op.to_string(),
            operand: operand.to_string(),
        })
}

pub fn check_assignment(expected: &TypeNode, received: &TypeNode) -> Result<(), ErrorImpl> {
    if received.is_assignable_to(expected) {
        Ok(())
    } else {
        Err(ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.to_string(),
        })
    }
}

/// The type recorded for a declared symbol.
///
/// A bare `array`/`object` (or one with an `any` parameter) takes the more
/// precise container type of its value. Everything else keeps the annotation
/// as written, so `int` and `uint` survive for later truncation.
pub fn declared_type(annotation: &TypeNode, value: &TypeNode) -> TypeNode {
    let normalized = annotation.normalize();
    let Some(element) = normalized.element_type() else {
        return annotation.clone();
    };
    if !element.is_any() {
        return annotation.clone();
    }

    let value = value.normalize();
    match (normalized.name(), value.name(), value.element_type()) {
        (Some(expected), Some(received), Some(inner)) if expected == received && !inner.is_any() => {
            value
        }
        _ => annotation.clone(),
    }
}

/// Type of `receiver[index]`, and the type the index must have.
pub fn index_type(receiver: &TypeNode) -> Result<(TypeNode, TypeNode), ErrorImpl> {
    let normalized = receiver.normalize();
    match receiver.category().as_str() {
        "array" => Ok((
            normalized.element_type().unwrap_or_else(TypeNode::any),
            TypeNode::number(),
        )),
        "object" => Ok((
            normalized.element_type().unwrap_or_else(TypeNode::any),
            TypeNode::string(),
        )),
        "string" => Ok((TypeNode::string(), TypeNode::number())),
        "any" => Ok((TypeNode::any(), TypeNode::any())),
        _ => Err(ErrorImpl::TypeMismatch {
            expected: String::from("array | object | string"),
            received: receiver.to_string(),
        }),
    }
}

/// Resolves `receiver.name`, or `receiver.name(...)` when `called` is set.
pub fn resolve_member(receiver: &TypeNode, name: &str, called: bool) -> Result<Member, ErrorImpl> {
    let category = receiver.category();
    if category == "any" {
        return Ok(Member::dynamic(TypeNode::any()));
    }

    let element = receiver.element_type().unwrap_or_else(TypeNode::any);
    let info = match property(&category, name) {
        Some(info) if category != "object" || called => info,
        _ if category == "object" => return Ok(Member::dynamic(element)),
        _ => {
            return Err(ErrorImpl::UnknownProperty {
                property: name.to_string(),
                type_: receiver.to_string(),
            })
        }
    };

    if called && !info.method {
        return Err(ErrorImpl::NotCallable {
            name: name.to_string(),
        });
    }

    let params = info
        .params
        .iter()
        .map(|param| table_type(param, &element))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Member {
        // A method referenced without a call is a function value.
        type_: if info.method && !called {
            TypeNode::func()
        } else {
            table_type(info.type_, &element)?
        },
        method: info.method,
        params,
        variadic: info.variadic,
        emit: info.emit,
        dynamic: false,
    })
}

/// Checks call arguments against parameter types.
///
/// Every problem is returned, so a call with several bad arguments reports
/// each of them. Variadic parameters skip the count check and match extra
/// arguments against the last parameter type.
pub fn check_arguments(params: &[TypeNode], variadic: bool, args: &[TypeNode]) -> Vec<ErrorImpl> {
    let mut errors = vec![];
    if !variadic && params.len() != args.len() {
        errors.push(ErrorImpl::ArgumentCount {
            expected: params.len(),
            received: args.len(),
        });
    }

    for (i, arg) in args.iter().enumerate() {
        let expected = if variadic {
            params.get(i).or(params.last())
        } else {
            params.get(i)
        };
        let Some(expected) = expected else {
            continue;
        };

        if !arg.is_assignable_to(expected) {
            errors.push(ErrorImpl::ArgumentType {
                expected: expected.to_string(),
                received: arg.to_string(),
            });
        }
    }

    errors
}

fn table_type(text: &str, element: &TypeNode) -> Result<TypeNode, ErrorImpl> {
    Ok(substitute(&parse_type(text)?, element))
}

fn substitute(type_: &TypeNode, element: &TypeNode) -> TypeNode {
    match type_ {
        TypeNode::Named { name, .. } if name == "T" => element.clone(),
        TypeNode::Named { name, params } => TypeNode::Named {
            name: name.clone(),
            params: params.iter().map(|p| substitute(p, element)).collect(),
        },
        TypeNode::Union { types } => TypeNode::Union {
            types: types.iter().map(|t| substitute(t, element)).collect(),
        },
    }
}
