//! Unit tests for operator typing, property resolution and scopes.

use super::{
    lookups::Emit,
    scope::{ScopeStack, Symbol},
    type_checker::{
        apply_binary, apply_unary, check_arguments, check_assignment, declared_type, index_type,
        resolve_member,
    },
};
use crate::{ast::types::TypeNode, errors::errors::ErrorImpl, lexer::tokens::Operator};

fn named(name: &str) -> TypeNode {
    TypeNode::named(name)
}

#[test]
fn test_arithmetic() {
    assert_eq!(
        apply_binary(Operator::Add, &named("int"), &named("float")),
        Ok(TypeNode::number())
    );
    assert_eq!(
        apply_binary(Operator::Mod, &named("number"), &named("uint")),
        Ok(TypeNode::number())
    );
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        apply_binary(Operator::Add, &TypeNode::string(), &named("int")),
        Ok(TypeNode::string())
    );
    assert_eq!(
        apply_binary(Operator::Add, &named("int"), &TypeNode::string()),
        Ok(TypeNode::string())
    );
    assert_eq!(
        apply_binary(Operator::AddAssign, &TypeNode::string(), &TypeNode::string()),
        Ok(TypeNode::string())
    );
}

#[test]
fn test_operator_mismatch() {
    let error = apply_binary(Operator::Sub, &TypeNode::string(), &TypeNode::number()).unwrap_err();
    assert_eq!(
        error,
        ErrorImpl::OperatorMismatch {
            operator: "-".to_string(),
            left: "string".to_string(),
            right: "number".to_string(),
        }
    );

    assert!(apply_binary(Operator::Less, &TypeNode::string(), &TypeNode::string()).is_err());
    assert!(apply_binary(Operator::Add, &TypeNode::array_of(named("int")), &TypeNode::number()).is_err());
    assert!(apply_binary(Operator::Mul, &TypeNode::number(), &TypeNode::boolean()).is_err());
}

#[test]
fn test_comparison_and_logic() {
    assert_eq!(
        apply_binary(Operator::Less, &named("int"), &TypeNode::number()),
        Ok(TypeNode::boolean())
    );
    assert_eq!(
        apply_binary(Operator::Equals, &TypeNode::string(), &TypeNode::string()),
        Ok(TypeNode::boolean())
    );
    assert_eq!(
        apply_binary(Operator::And, &named("bool"), &TypeNode::number()),
        Ok(TypeNode::boolean())
    );
}

#[test]
fn test_any_operands() {
    assert_eq!(
        apply_binary(Operator::Equals, &TypeNode::any(), &TypeNode::string()),
        Ok(TypeNode::boolean())
    );
    assert_eq!(
        apply_binary(Operator::Sub, &TypeNode::number(), &TypeNode::any()),
        Ok(TypeNode::number())
    );
    assert_eq!(
        apply_binary(Operator::Add, &TypeNode::any(), &TypeNode::number()),
        Ok(TypeNode::any())
    );
    assert!(apply_binary(Operator::Less, &TypeNode::any(), &TypeNode::string()).is_err());
}

#[test]
fn test_unary() {
    assert_eq!(
        apply_unary(Operator::Not, &TypeNode::number()),
        Ok(TypeNode::boolean())
    );
    assert_eq!(
        apply_unary(Operator::Sub, &named("int")),
        Ok(TypeNode::number())
    );
    assert_eq!(apply_unary(Operator::Sub, &TypeNode::any()), Ok(TypeNode::number()));
    assert!(matches!(
        apply_unary(Operator::Sub, &TypeNode::string()),
        Err(ErrorImpl::UnaryOperatorMismatch { .. })
    ));
}

#[test]
fn test_check_assignment() {
    assert!(check_assignment(&TypeNode::any(), &TypeNode::string()).is_ok());
    assert!(check_assignment(&named("int"), &TypeNode::number()).is_ok());
    assert!(check_assignment(&TypeNode::string(), &TypeNode::any()).is_ok());
    assert_eq!(
        check_assignment(&TypeNode::string(), &TypeNode::number()),
        Err(ErrorImpl::TypeMismatch {
            expected: "string".to_string(),
            received: "number".to_string(),
        })
    );
    assert!(check_assignment(
        &TypeNode::array_of(TypeNode::string()),
        &TypeNode::array_of(TypeNode::number())
    )
    .is_err());
}

#[test]
fn test_declared_type_takes_precise_container() {
    let split = TypeNode::array_of(TypeNode::string());

    assert_eq!(declared_type(&named("array"), &split), split);
    assert_eq!(
        declared_type(&TypeNode::array_of(TypeNode::any()), &split),
        split
    );
    assert_eq!(
        declared_type(&named("array"), &TypeNode::array_of(TypeNode::any())),
        named("array")
    );
    assert_eq!(
        declared_type(&named("object"), &split),
        named("object")
    );
    assert_eq!(declared_type(&named("int"), &TypeNode::number()), named("int"));
}

#[test]
fn test_index_type() {
    assert_eq!(
        index_type(&TypeNode::array_of(named("int"))),
        Ok((TypeNode::number(), TypeNode::number()))
    );
    assert_eq!(
        index_type(&TypeNode::object_of(TypeNode::string())),
        Ok((TypeNode::string(), TypeNode::string()))
    );
    assert_eq!(
        index_type(&TypeNode::string()),
        Ok((TypeNode::string(), TypeNode::number()))
    );
    assert_eq!(
        index_type(&TypeNode::any()),
        Ok((TypeNode::any(), TypeNode::any()))
    );
    assert!(index_type(&TypeNode::boolean()).is_err());
}

#[test]
fn test_string_members() {
    let length = resolve_member(&TypeNode::string(), "length", false).unwrap();
    assert_eq!(length.type_, TypeNode::number());
    assert!(!length.method);

    let split = resolve_member(&TypeNode::string(), "split", true).unwrap();
    assert_eq!(split.type_, TypeNode::array_of(TypeNode::string()));
    assert_eq!(split.params, vec![TypeNode::string()]);

    let to_number = resolve_member(&TypeNode::string(), "toNumber", true).unwrap();
    assert_eq!(to_number.emit, Emit::Prelude("__hsc_toNumber"));

    assert_eq!(
        resolve_member(&TypeNode::string(), "length", true),
        Err(ErrorImpl::NotCallable {
            name: "length".to_string()
        })
    );
    assert_eq!(
        resolve_member(&TypeNode::string(), "trim", false).unwrap().type_,
        TypeNode::func()
    );
}

#[test]
fn test_array_members_use_element_type() {
    let array = TypeNode::array_of(TypeNode::string());

    let push = resolve_member(&array, "push", true).unwrap();
    assert_eq!(push.type_, TypeNode::void());
    assert_eq!(push.params, vec![TypeNode::string()]);
    assert!(push.variadic);

    let slice = resolve_member(&array, "slice", true).unwrap();
    assert_eq!(slice.type_, array);
    assert_eq!(slice.params, vec![named("int"), named("int")]);
}

#[test]
fn test_object_members() {
    let object = TypeNode::object_of(named("int"));

    let keys = resolve_member(&object, "keys", true).unwrap();
    assert_eq!(keys.type_, TypeNode::array_of(TypeNode::string()));
    assert_eq!(keys.emit, Emit::Prelude("__hsc_keys"));

    let values = resolve_member(&object, "values", true).unwrap();
    assert_eq!(values.type_, TypeNode::array_of(TypeNode::number()));

    let field = resolve_member(&object, "name", false).unwrap();
    assert_eq!(field.type_, TypeNode::number());
    assert!(field.dynamic);

    assert_eq!(
        resolve_member(&object, "keys", false).unwrap().type_,
        TypeNode::number()
    );
}

#[test]
fn test_unknown_members() {
    assert_eq!(
        resolve_member(&TypeNode::number(), "length", false),
        Err(ErrorImpl::UnknownProperty {
            property: "length".to_string(),
            type_: "number".to_string(),
        })
    );
    assert!(resolve_member(&TypeNode::boolean(), "x", false).is_err());

    let dynamic = resolve_member(&TypeNode::any(), "anything", true).unwrap();
    assert_eq!(dynamic.type_, TypeNode::any());
    assert!(dynamic.dynamic);
}

#[test]
fn test_check_arguments() {
    let params = vec![TypeNode::number(), TypeNode::string()];

    assert!(check_arguments(&params, false, &[TypeNode::number(), TypeNode::string()]).is_empty());
    assert_eq!(
        check_arguments(&params, false, &[TypeNode::number()]),
        vec![ErrorImpl::ArgumentCount {
            expected: 2,
            received: 1
        }]
    );
    assert_eq!(
        check_arguments(&params, false, &[TypeNode::string(), TypeNode::number()]).len(),
        2
    );
}

#[test]
fn test_check_variadic_arguments() {
    let params = vec![named("int"), named("int")];
    assert!(check_arguments(&params, true, &[TypeNode::number()]).is_empty());
    assert!(check_arguments(
        &params,
        true,
        &[TypeNode::number(), TypeNode::number(), TypeNode::number()]
    )
    .is_empty());

    let errors = check_arguments(&[TypeNode::string()], true, &[TypeNode::string(), TypeNode::number()]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_scope_lookup_and_shadowing() {
    let mut scopes = ScopeStack::new();
    scopes.upsert(Symbol::var("a", named("int"), false));

    scopes.push_frame();
    assert!(scopes.lookup("a").is_some());
    assert!(scopes.lookup_current("a").is_none());

    scopes.upsert(Symbol::var("a", TypeNode::string(), true));
    assert_eq!(scopes.lookup("a").unwrap().value_type(), TypeNode::string());

    scopes.pop_frame();
    assert_eq!(scopes.lookup("a").unwrap().value_type(), named("int"));
    assert!(scopes.pop_frame().is_none());
    assert_eq!(scopes.depth(), 1);
}

#[test]
fn test_frame_keeps_declaration_order() {
    let mut scopes = ScopeStack::new();
    scopes.upsert(Symbol::var("b", TypeNode::number(), false));
    scopes.upsert(Symbol::var("a", TypeNode::number(), false));
    scopes.upsert(Symbol::var("b", TypeNode::string(), false));

    let names: Vec<&str> = scopes
        .current()
        .symbols()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}
