//! Unit tests for type normalization and assignability.

use super::{
    expressions::{AccessChain, AccessStep},
    types::TypeNode,
};

fn array(element: &str) -> TypeNode {
    TypeNode::array_of(TypeNode::named(element))
}

#[test]
fn test_normalize_aliases() {
    assert_eq!(TypeNode::named("int").normalize(), TypeNode::number());
    assert_eq!(TypeNode::named("uint").normalize(), TypeNode::number());
    assert_eq!(TypeNode::named("float").normalize(), TypeNode::number());
    assert_eq!(TypeNode::named("bool").normalize(), TypeNode::boolean());
    assert_eq!(TypeNode::named("null").normalize(), TypeNode::any());
    assert_eq!(TypeNode::named("void").normalize(), TypeNode::void());
}

#[test]
fn test_normalize_container_defaults() {
    assert_eq!(TypeNode::named("array").normalize(), array("any"));
    assert_eq!(
        TypeNode::named("object").normalize(),
        TypeNode::object_of(TypeNode::any())
    );
    assert_eq!(
        TypeNode::array_of(TypeNode::named("int")).normalize(),
        array("number")
    );
}

#[test]
fn test_normalize_flattens_unions() {
    let union = TypeNode::Union {
        types: vec![
            TypeNode::named("int"),
            TypeNode::Union {
                types: vec![TypeNode::string(), TypeNode::named("bool")],
            },
        ],
    };

    assert_eq!(
        union.normalize(),
        TypeNode::Union {
            types: vec![TypeNode::number(), TypeNode::string(), TypeNode::boolean()]
        }
    );
}

#[test]
fn test_anything_is_assignable_to_any() {
    for t in [
        TypeNode::number(),
        TypeNode::string(),
        array("string"),
        TypeNode::func(),
        TypeNode::void(),
    ] {
        assert!(t.is_assignable_to(&TypeNode::any()), "{} -> any", t);
    }
}

#[test]
fn test_container_parameters() {
    assert!(!array("number").is_assignable_to(&array("string")));
    assert!(array("any").is_assignable_to(&array("string")));
    assert!(array("string").is_assignable_to(&TypeNode::named("array")));
    assert!(array("int").is_assignable_to(&array("float")));
}

#[test]
fn test_names_must_match() {
    assert!(!TypeNode::string().is_assignable_to(&TypeNode::number()));
    assert!(TypeNode::named("int").is_assignable_to(&TypeNode::number()));
    assert!(!array("string").is_assignable_to(&TypeNode::object_of(TypeNode::string())));
}

#[test]
fn test_union_assignability() {
    let union = TypeNode::Union {
        types: vec![TypeNode::string(), TypeNode::number()],
    };

    assert!(TypeNode::number().is_assignable_to(&union));
    assert!(union.is_assignable_to(&TypeNode::string()));
    assert!(!TypeNode::boolean().is_assignable_to(&union));
}

#[test]
fn test_any_source_is_assignable() {
    assert!(TypeNode::any().is_assignable_to(&TypeNode::number()));
}

#[test]
fn test_display() {
    assert_eq!(
        TypeNode::object_of(array("string")).to_string(),
        "object<array<string>>"
    );
    let union = TypeNode::Union {
        types: vec![TypeNode::string(), TypeNode::number()],
    };
    assert_eq!(union.to_string(), "string | number");
}

#[test]
fn test_category() {
    assert_eq!(TypeNode::named("uint").category(), "number");
    assert_eq!(array("string").category(), "array");
    let union = TypeNode::Union {
        types: vec![TypeNode::string(), TypeNode::number()],
    };
    assert_eq!(union.category(), "any");
}

#[test]
fn test_access_chain_split_last() {
    let chain = AccessChain {
        base: String::from("s"),
        steps: vec![AccessStep::Prop(String::from("split"))],
    };

    let (receiver, last) = chain.split_last().unwrap();
    assert_eq!(receiver, AccessChain::simple("s"));
    assert_eq!(last, &AccessStep::Prop(String::from("split")));

    assert!(AccessChain::simple("s").split_last().is_none());
}
