//! Type annotations and the assignability relation.
//!
//! Types are kept exactly as written (`int`, `array`, `bool`) inside the AST
//! so that integer truncation can still be emitted for `int` and `uint`
//! declarations. Comparisons always go through `normalize`, which resolves
//! the aliases and fills in default container parameters.

use std::fmt::Display;

use serde::Serialize;

/// A type annotation: a named type with optional generic parameters, or a
/// union of alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeNode {
    #[serde(rename = "type")]
    Named { name: String, params: Vec<TypeNode> },
    Union { types: Vec<TypeNode> },
}

impl TypeNode {
    pub fn named(name: &str) -> TypeNode {
        TypeNode::Named {
            name: name.to_string(),
            params: vec![],
        }
    }

    pub fn with_params(name: &str, params: Vec<TypeNode>) -> TypeNode {
        TypeNode::Named {
            name: name.to_string(),
            params,
        }
    }

    pub fn any() -> TypeNode {
        TypeNode::named("any")
    }

    pub fn void() -> TypeNode {
        TypeNode::named("void")
    }

    pub fn number() -> TypeNode {
        TypeNode::named("number")
    }

    pub fn string() -> TypeNode {
        TypeNode::named("string")
    }

    pub fn boolean() -> TypeNode {
        TypeNode::named("boolean")
    }

    pub fn func() -> TypeNode {
        TypeNode::named("func")
    }

    pub fn array_of(element: TypeNode) -> TypeNode {
        TypeNode::with_params("array", vec![element])
    }

    pub fn object_of(element: TypeNode) -> TypeNode {
        TypeNode::with_params("object", vec![element])
    }

    /// The name as written, `None` for unions.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeNode::Named { name, .. } => Some(name),
            TypeNode::Union { .. } => None,
        }
    }

    pub fn is_int(&self) -> bool {
        self.name() == Some("int")
    }

    pub fn is_uint(&self) -> bool {
        self.name() == Some("uint")
    }

    /// Whether the annotation is literally `null`, which is never a valid
    /// declaration type.
    pub fn is_null(&self) -> bool {
        self.name() == Some("null")
    }

    pub fn is_any(&self) -> bool {
        self.normalize().name() == Some("any")
    }

    pub fn is_void(&self) -> bool {
        self.normalize().name() == Some("void")
    }

    /// Resolves aliases, defaults `array`/`object` to one `any` parameter and
    /// flattens nested unions.
    pub fn normalize(&self) -> TypeNode {
        match self {
            TypeNode::Named { name, params } => {
                let name = match name.as_str() {
                    "int" | "uint" | "float" => "number",
                    "bool" => "boolean",
                    "null" => "any",
                    other => other,
                };

                let mut params: Vec<TypeNode> = params.iter().map(TypeNode::normalize).collect();
                if (name == "array" || name == "object") && params.is_empty() {
                    params.push(TypeNode::any());
                }

                TypeNode::Named {
                    name: name.to_string(),
                    params,
                }
            }
            TypeNode::Union { types } => {
                let mut flat: Vec<TypeNode> = vec![];
                for member in types.iter().map(TypeNode::normalize) {
                    match member {
                        TypeNode::Union { types } => flat.extend(types),
                        named => flat.push(named),
                    }
                }
                flat.dedup();

                if flat.len() == 1 {
                    flat.remove(0)
                } else {
                    TypeNode::Union { types: flat }
                }
            }
        }
    }

    /// The key used by the operator and property tables. Unions have no
    /// single category and are treated as `any`.
    pub fn category(&self) -> String {
        match self.normalize() {
            TypeNode::Named { name, .. } => name,
            TypeNode::Union { .. } => String::from("any"),
        }
    }

    /// The element type of a normalized `array` or `object`.
    pub fn element_type(&self) -> Option<TypeNode> {
        match self.normalize() {
            TypeNode::Named { name, mut params } if name == "array" || name == "object" => {
                params.pop()
            }
            _ => None,
        }
    }

    /// Whether a value of type `self` may be stored where `to` is expected.
    pub fn is_assignable_to(&self, to: &TypeNode) -> bool {
        is_assignable(&self.normalize(), &to.normalize())
    }
}

fn is_assignable(from: &TypeNode, to: &TypeNode) -> bool {
    if let TypeNode::Union { types } = from {
        return types.iter().any(|t| is_assignable(t, to));
    }
    if let TypeNode::Union { types } = to {
        return types.iter().any(|t| is_assignable(from, t));
    }

    let (
        TypeNode::Named {
            name: from_name,
            params: from_params,
        },
        TypeNode::Named {
            name: to_name,
            params: to_params,
        },
    ) = (from, to)
    else {
        return false;
    };

    if to_name == "any" || from_name == "any" {
        return true;
    }
    if from_name != to_name {
        return false;
    }
    if to_params.is_empty() {
        return true;
    }
    if from_params.len() != to_params.len() {
        return false;
    }

    from_params
        .iter()
        .zip(to_params)
        .all(|(f, t)| f.name() == Some("any") || is_assignable(f, t))
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Named { name, params } if params.is_empty() => write!(f, "{}", name),
            TypeNode::Named { name, params } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "{}<{}>", name, params.join(", "))
            }
            TypeNode::Union { types } => {
                let types: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", types.join(" | "))
            }
        }
    }
}
