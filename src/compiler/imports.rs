//! Loading of import files.
//!
//! An import file is a JSON header describing the module, a line holding
//! only `---`, and the module's JavaScript source:
//!
//! ```text
//! {
//!   "module": "io",
//!   "functions": [{ "name": "print", "params": ["any"], "returns": "void", "variadic": true }],
//!   "properties": [{ "name": "version", "type": "string", "value": "1.0" }]
//! }
//! ---
//! function print(...args) { console.log(...args); }
//! ```

use std::fs;

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    ast::types::TypeNode,
    config::CompileOptions,
    errors::errors::ErrorImpl,
    parser::{expr::is_identifier, types::parse_type},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    module: String,
    custom_return: Option<String>,
    #[serde(default)]
    functions: Vec<RawFunction>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    params: Vec<Value>,
    returns: Option<Value>,
    #[serde(default, rename = "async")]
    is_async: bool,
    #[serde(default)]
    variadic: bool,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(rename = "type")]
    type_: Option<Value>,
    value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleFunction {
    pub name: String,
    pub params: Vec<TypeNode>,
    pub returns: TypeNode,
    pub is_async: bool,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProperty {
    pub name: String,
    pub type_: TypeNode,
    pub value: Option<Value>,
}

/// A loaded import, bound to `module` in the generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedModule {
    /// The path exactly as written in the `import` statement.
    pub path: String,
    pub module: String,
    pub code: String,
    pub custom_return: Option<String>,
    pub functions: Vec<ModuleFunction>,
    pub properties: Vec<ModuleProperty>,
}

impl ImportedModule {
    pub fn function(&self, name: &str) -> Option<&ModuleFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&ModuleProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The object literal returned from the module wrapper.
    pub fn exports(&self) -> String {
        if let Some(custom_return) = &self.custom_return {
            return custom_return.clone();
        }

        let mut entries: Vec<String> = self.functions.iter().map(|f| f.name.clone()).collect();
        for property in &self.properties {
            match &property.value {
                Some(value) => entries.push(format!("{}: {}", property.name, value)),
                None => entries.push(property.name.clone()),
            }
        }

        if entries.is_empty() {
            String::from("{}")
        } else {
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

/// Reads and parses the import at `path`.
///
/// # Arguments
///
/// * `path` - The literal path from the `import` statement
/// * `options` - Supplies the home and imports directories used to resolve it
pub fn load_module(path: &str, options: &CompileOptions) -> Result<ImportedModule, ErrorImpl> {
    let resolved = options.resolve_import_path(path);
    info!("Importing '{}' from {}", path, resolved.display());

    let raw = fs::read_to_string(&resolved).map_err(|e| ErrorImpl::ImportUnreadable {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    parse_module(path, &raw)
}

/// Parses the contents of an import file.
pub fn parse_module(path: &str, raw: &str) -> Result<ImportedModule, ErrorImpl> {
    let (header, code) = split_sections(raw).ok_or_else(|| ErrorImpl::MissingSeparator {
        path: path.to_string(),
    })?;

    let metadata: RawMetadata =
        serde_json::from_str(header).map_err(|e| ErrorImpl::InvalidMetadata {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    check_name(path, "module name", &metadata.module)?;
    if let Some(custom_return) = &metadata.custom_return {
        if custom_return.trim().is_empty() {
            return Err(ErrorImpl::InvalidImportName {
                path: path.to_string(),
                field: String::from("customReturn"),
                name: custom_return.clone(),
            });
        }
    }

    let functions = metadata
        .functions
        .into_iter()
        .map(|function| -> Result<ModuleFunction, ErrorImpl> {
            check_name(path, "function name", &function.name)?;
            Ok(ModuleFunction {
                params: function
                    .params
                    .iter()
                    .map(|param| type_value(path, param))
                    .collect::<Result<Vec<_>, _>>()?,
                returns: match &function.returns {
                    Some(returns) => return_type(path, returns)?,
                    None => TypeNode::any(),
                },
                name: function.name,
                is_async: function.is_async,
                variadic: function.variadic,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let properties = metadata
        .properties
        .into_iter()
        .map(|property| -> Result<ModuleProperty, ErrorImpl> {
            check_name(path, "property name", &property.name)?;
            Ok(ModuleProperty {
                type_: match &property.type_ {
                    Some(type_) => type_value(path, type_)?,
                    None => TypeNode::any(),
                },
                name: property.name,
                value: property.value,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Module '{}': {} functions, {} properties",
        metadata.module,
        functions.len(),
        properties.len()
    );

    Ok(ImportedModule {
        path: path.to_string(),
        module: metadata.module,
        code: code.to_string(),
        custom_return: metadata.custom_return,
        functions,
        properties,
    })
}

/// Names from the header are spliced into the output as JavaScript
/// identifiers.
fn check_name(path: &str, field: &str, name: &str) -> Result<(), ErrorImpl> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ErrorImpl::InvalidImportName {
            path: path.to_string(),
            field: field.to_string(),
            name: name.to_string(),
        })
    }
}

/// Splits at the first line that is exactly `---`.
fn split_sections(raw: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some((&raw[..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn type_value(path: &str, value: &Value) -> Result<TypeNode, ErrorImpl> {
    let Value::String(text) = value else {
        return Err(ErrorImpl::InvalidTypeValue {
            path: path.to_string(),
            value: value.to_string(),
        });
    };

    parse_type(text).map_err(|e| ErrorImpl::InvalidMetadata {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// `"returns"` is a type string or a list of alternatives.
fn return_type(path: &str, value: &Value) -> Result<TypeNode, ErrorImpl> {
    match value {
        Value::Array(alternatives) => {
            let mut types = alternatives
                .iter()
                .map(|alternative| type_value(path, alternative))
                .collect::<Result<Vec<_>, _>>()?;
            match types.len() {
                0 => Ok(TypeNode::any()),
                1 => Ok(types.remove(0)),
                _ => Ok(TypeNode::Union { types }),
            }
        }
        other => type_value(path, other),
    }
}
