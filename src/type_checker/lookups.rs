//! Operator and property tables, keyed by type category.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::lexer::tokens::Operator;

/// How a built-in property is written in the generated code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emit {
    /// `target.name` / `target.name(args)`
    Member,
    /// `helper(target, args)` using a prelude function.
    Prelude(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    /// Result type. `T` stands for the element type of the receiver.
    pub type_: &'static str,
    pub method: bool,
    pub params: Vec<&'static str>,
    /// Any number of arguments; extra arguments use the last parameter type.
    pub variadic: bool,
    pub emit: Emit,
}

fn field(type_: &'static str) -> PropertyInfo {
    PropertyInfo {
        type_,
        method: false,
        params: vec![],
        variadic: false,
        emit: Emit::Member,
    }
}

fn method(type_: &'static str, params: Vec<&'static str>, variadic: bool) -> PropertyInfo {
    PropertyInfo {
        type_,
        method: true,
        params,
        variadic,
        emit: Emit::Member,
    }
}

fn prelude(type_: &'static str, helper: &'static str) -> PropertyInfo {
    PropertyInfo {
        type_,
        method: true,
        params: vec![],
        variadic: false,
        emit: Emit::Prelude(helper),
    }
}

lazy_static! {
    /// Binary operators: left operand category -> result category.
    pub static ref BINARY_OPERATOR_TYPES: HashMap<Operator, Vec<(&'static str, &'static str)>> = {
        let mut map = HashMap::new();
        let arithmetic = vec![("number", "number")];
        let comparison = vec![("number", "boolean")];
        let equality = vec![("number", "boolean"), ("string", "boolean"), ("boolean", "boolean")];

        map.insert(Operator::Add, vec![("number", "number"), ("string", "string")]);
        map.insert(Operator::AddAssign, vec![("number", "number"), ("string", "string")]);
        for op in [
            Operator::Sub,
            Operator::SubAssign,
            Operator::Mul,
            Operator::MulAssign,
            Operator::Div,
            Operator::DivAssign,
            Operator::Mod,
        ] {
            map.insert(op, arithmetic.clone());
        }
        for op in [Operator::Less, Operator::Greater, Operator::LessEquals, Operator::GreaterEquals] {
            map.insert(op, comparison.clone());
        }
        for op in [Operator::Equals, Operator::NotEquals, Operator::And, Operator::Or] {
            map.insert(op, equality.clone());
        }
        map
    };

    /// Prefix operators: operand category -> result category.
    pub static ref UNARY_OPERATOR_TYPES: HashMap<Operator, Vec<(&'static str, &'static str)>> = {
        let mut map = HashMap::new();
        map.insert(
            Operator::Not,
            vec![("boolean", "boolean"), ("string", "boolean"), ("number", "boolean")],
        );
        map.insert(Operator::Sub, vec![("number", "number")]);
        map
    };

    pub static ref PROPERTY_TYPES: HashMap<&'static str, HashMap<&'static str, PropertyInfo>> = {
        let mut map = HashMap::new();

        let mut string = HashMap::new();
        string.insert("length", field("number"));
        string.insert("slice", method("string", vec!["int", "int"], true));
        string.insert("trim", method("string", vec![], false));
        string.insert("toNumber", prelude("number", "__hsc_toNumber"));
        string.insert("split", method("array<string>", vec!["string"], false));
        map.insert("string", string);

        let mut number = HashMap::new();
        number.insert("toString", method("string", vec![], false));
        map.insert("number", number);

        let mut object = HashMap::new();
        object.insert("keys", prelude("array<string>", "__hsc_keys"));
        object.insert("values", prelude("array<T>", "__hsc_values"));
        object.insert("entries", prelude("array<array<any>>", "__hsc_entries"));
        map.insert("object", object);

        let mut array = HashMap::new();
        array.insert("length", field("number"));
        array.insert("slice", method("array<T>", vec!["int", "int"], true));
        array.insert("join", method("string", vec!["string"], false));
        array.insert("push", method("void", vec!["T"], true));
        map.insert("array", array);

        map
    };
}

/// Looks up a built-in property for a type category.
pub fn property(category: &str, name: &str) -> Option<&'static PropertyInfo> {
    PROPERTY_TYPES.get(category)?.get(name)
}

/// The result category of a table entry, if the operator accepts `category`.
pub fn operator_result(
    table: &HashMap<Operator, Vec<(&'static str, &'static str)>>,
    op: Operator,
    category: &str,
) -> Option<&'static str> {
    table
        .get(&op)?
        .iter()
        .find(|(input, _)| *input == category)
        .map(|(_, result)| *result)
}

/// The single result category of an operator whose entries all agree.
pub fn uniform_result(
    table: &HashMap<Operator, Vec<(&'static str, &'static str)>>,
    op: Operator,
) -> Option<&'static str> {
    let entries = table.get(&op)?;
    let (_, first) = entries.first()?;
    entries
        .iter()
        .all(|(_, result)| result == first)
        .then_some(*first)
}
