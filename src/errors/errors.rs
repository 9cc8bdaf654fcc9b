use std::fmt::Display;

use thiserror::Error;

/// A diagnostic produced while tokenizing, parsing or compiling a script.
///
/// Every diagnostic carries the 1-based source line it was reported on and
/// renders as `Line <n>: <Category>: <message>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    line: usize,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, line: usize) -> Self {
        Error {
            internal_error: error_impl,
            line,
        }
    }

    pub fn get_line(&self) -> usize {
        self.line
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::MissingSemicolon => "MissingSemicolon",
            ErrorImpl::UnexpectedKeyword { .. } => "UnexpectedKeyword",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::UnexpectedEndOfExpression => "UnexpectedEndOfExpression",
            ErrorImpl::ExpectedReturnType => "ExpectedReturnType",
            ErrorImpl::InvalidParameter { .. } => "InvalidParameter",
            ErrorImpl::InvalidType { .. } => "InvalidType",
            ErrorImpl::InvalidLiteral { .. } => "InvalidLiteral",
            ErrorImpl::ArrowWithoutBlock => "ArrowWithoutBlock",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::ConstantModified { .. } => "ConstantModified",
            ErrorImpl::NestedImport => "NestedImport",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::DanglingElse => "DanglingElse",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::UnknownModuleMember { .. } => "UnknownModuleMember",
            ErrorImpl::DuplicateImport { .. } => "DuplicateImport",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::OperatorMismatch { .. } => "OperatorMismatch",
            ErrorImpl::UnaryOperatorMismatch { .. } => "UnaryOperatorMismatch",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::ArgumentType { .. } => "ArgumentType",
            ErrorImpl::InvalidCondition { .. } => "InvalidCondition",
            ErrorImpl::NullDeclaration => "NullDeclaration",
            ErrorImpl::UnknownProperty { .. } => "UnknownProperty",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::MissingSeparator { .. } => "MissingSeparator",
            ErrorImpl::InvalidMetadata { .. } => "InvalidMetadata",
            ErrorImpl::ImportUnreadable { .. } => "ImportUnreadable",
            ErrorImpl::DuplicateModule { .. } => "DuplicateModule",
            ErrorImpl::InvalidTypeValue { .. } => "InvalidTypeValue",
            ErrorImpl::InvalidImportName { .. } => "InvalidImportName",
            ErrorImpl::OutputCheck { .. } => "OutputCheck",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::MissingSemicolon
            | ErrorImpl::UnexpectedKeyword { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::ExpectedToken { .. }
            | ErrorImpl::UnexpectedEndOfExpression
            | ErrorImpl::ExpectedReturnType
            | ErrorImpl::InvalidParameter { .. }
            | ErrorImpl::InvalidType { .. }
            | ErrorImpl::InvalidLiteral { .. }
            | ErrorImpl::ArrowWithoutBlock
            | ErrorImpl::AlreadyDeclared { .. }
            | ErrorImpl::ConstantModified { .. }
            | ErrorImpl::NestedImport
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::DanglingElse => ErrorCategory::SyntaxError,
            ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::UnknownModuleMember { .. }
            | ErrorImpl::DuplicateImport { .. } => ErrorCategory::ReferenceError,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::OperatorMismatch { .. }
            | ErrorImpl::UnaryOperatorMismatch { .. }
            | ErrorImpl::ArgumentCount { .. }
            | ErrorImpl::ArgumentType { .. }
            | ErrorImpl::InvalidCondition { .. }
            | ErrorImpl::NullDeclaration
            | ErrorImpl::UnknownProperty { .. }
            | ErrorImpl::NotCallable { .. }
            | ErrorImpl::MissingReturnValue { .. } => ErrorCategory::TypeError,
            ErrorImpl::MissingSeparator { .. }
            | ErrorImpl::InvalidMetadata { .. }
            | ErrorImpl::ImportUnreadable { .. }
            | ErrorImpl::DuplicateModule { .. }
            | ErrorImpl::InvalidTypeValue { .. }
            | ErrorImpl::InvalidImportName { .. } => ErrorCategory::ImportError,
            ErrorImpl::OutputCheck { .. } => ErrorCategory::OutputCheckError,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::MissingSemicolon => {
                ErrorTip::Suggestion(String::from("End the statement with `;`"))
            }
            ErrorImpl::ExpectedReturnType => ErrorTip::Suggestion(String::from(
                "Functions are declared as `func <type> <name>(...) { ... }`",
            )),
            ErrorImpl::InvalidParameter { .. } => {
                ErrorTip::Suggestion(String::from("Parameters are written as `<type> <name>`"))
            }
            ErrorImpl::ArrowWithoutBlock => ErrorTip::Suggestion(String::from(
                "Wrap the lambda body in `{ ... }`",
            )),
            ErrorImpl::AlreadyDeclared { name } => ErrorTip::Suggestion(format!(
                "Assign to `{}` without a type to modify it",
                name
            )),
            ErrorImpl::ConstantModified { name } => ErrorTip::Suggestion(format!(
                "Declare `{}` without `const` if it needs to change",
                name
            )),
            ErrorImpl::NullDeclaration => {
                ErrorTip::Suggestion(String::from("Use `void` or `any` instead"))
            }
            ErrorImpl::InvalidCondition { .. } => ErrorTip::Suggestion(String::from(
                "Compare the value explicitly, e.g. `x != 0`",
            )),
            ErrorImpl::MissingSeparator { .. } => ErrorTip::Suggestion(String::from(
                "Separate the JSON header from the code with a line containing only `---`",
            )),
            ErrorImpl::DuplicateImport { .. } => {
                ErrorTip::Suggestion(String::from("Remove the second import"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: {}: {}",
            self.line,
            self.get_category(),
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SyntaxError,
    ReferenceError,
    TypeError,
    ImportError,
    InternalError,
    OutputCheckError,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::SyntaxError => "SyntaxError",
            ErrorCategory::ReferenceError => "ReferenceError",
            ErrorCategory::TypeError => "TypeError",
            ErrorCategory::ImportError => "ImportError",
            ErrorCategory::InternalError => "InternalError",
            ErrorCategory::OutputCheckError => "OutputCheckError",
        };
        write!(f, "{}", name)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Expected semicolon")]
    MissingSemicolon,
    #[error("Unexpected expression '{keyword}'")]
    UnexpectedKeyword { keyword: String },
    #[error("Unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("Expected '{expected}'")]
    ExpectedToken { expected: String },
    #[error("Unexpected end of expression")]
    UnexpectedEndOfExpression,
    #[error("Expected return type")]
    ExpectedReturnType,
    #[error("Invalid parameter '{parameter}'")]
    InvalidParameter { parameter: String },
    #[error("Invalid type '{type_}'")]
    InvalidType { type_: String },
    #[error("Invalid literal: {message}")]
    InvalidLiteral { message: String },
    #[error("Arrow functions must have block body")]
    ArrowWithoutBlock,
    #[error("Identifier '{name}' already declared in same scope")]
    AlreadyDeclared { name: String },
    #[error("Cannot modify constant '{name}'")]
    ConstantModified { name: String },
    #[error("Import statement must be on top level")]
    NestedImport,
    #[error("Return statement outside of function")]
    ReturnOutsideFunction,
    #[error("'else' without a preceding 'if'")]
    DanglingElse,

    #[error("Variable '{name}' not found")]
    VariableNotDeclared { name: String },
    #[error("Function '{name}' not found")]
    FunctionNotDeclared { name: String },
    #[error("Module '{module}' has no member '{member}'")]
    UnknownModuleMember { module: String, member: String },
    #[error("Cannot import twice: '{path}'")]
    DuplicateImport { path: String },

    #[error("Type '{received}' does not match '{expected}'")]
    TypeMismatch { expected: String, received: String },
    #[error("Cannot apply '{operator}' to {left} and {right}")]
    OperatorMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Cannot apply '{operator}' to {operand}")]
    UnaryOperatorMismatch { operator: String, operand: String },
    #[error("Expected {expected} arguments, got {received}")]
    ArgumentCount { expected: usize, received: usize },
    #[error("Expected '{expected}', got '{received}'")]
    ArgumentType { expected: String, received: String },
    #[error("{statement} statement condition must be 'bool'")]
    InvalidCondition { statement: String },
    #[error("Cannot use 'null' as declaration type, use 'void' instead")]
    NullDeclaration,
    #[error("Cannot find property '{property}' on {type_}")]
    UnknownProperty { property: String, type_: String },
    #[error("'{name}' is not callable")]
    NotCallable { name: String },
    #[error("Function must return a value of type '{expected}'")]
    MissingReturnValue { expected: String },

    #[error("Invalid import format in '{path}' (missing ---)")]
    MissingSeparator { path: String },
    #[error("Invalid import JSON in '{path}': {message}")]
    InvalidMetadata { path: String, message: String },
    #[error("Cannot read '{path}': {message}")]
    ImportUnreadable { path: String, message: String },
    #[error("Module '{module}' is already imported")]
    DuplicateModule { module: String },
    #[error("Invalid type value '{value}' in '{path}'")]
    InvalidTypeValue { path: String, value: String },
    #[error("Invalid {field} '{name}' in '{path}'")]
    InvalidImportName {
        path: String,
        field: String,
        name: String,
    },

    #[error("{message}")]
    OutputCheck { message: String },
}
