//! Integration tests for end-to-end compilation.
//!
//! These tests run complete scripts through tokenization, parsing, type
//! checking, JavaScript generation and the output check.

use std::{fs, path::PathBuf};

use huopascript::{
    compile_source,
    config::CompileOptions,
    errors::errors::{Error, ErrorCategory},
};

const IO_MODULE: &str = r#"{
  "module": "io",
  "functions": [
    { "name": "print", "params": ["any"], "returns": "void", "variadic": true },
    { "name": "ask", "params": ["string"], "returns": "string", "async": true }
  ],
  "properties": [
    { "name": "version", "type": "string", "value": "1.0" }
  ]
}
---
function print(...args) { console.log(...args); }
async function ask(question) { return question; }
"#;

/// A fresh imports directory holding the given files.
fn imports_dir(test: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hsc_{}_{}", test, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
    dir
}

fn options(dir: PathBuf) -> CompileOptions {
    CompileOptions {
        imports_dir: dir,
        home_dir: None,
        check_output: true,
    }
}

fn compile(source: &str) -> Result<String, Vec<Error>> {
    let output = compile_source(source, &options(std::env::temp_dir()));
    if output.errors.is_empty() {
        Ok(output.code)
    } else {
        Err(output.errors)
    }
}

#[test]
fn test_compile_simple_program() {
    let code = compile("int x = 42;\nstring s = \"hi\";").unwrap();
    assert_eq!(
        code,
        "(async () => {\n// Embedded imports\n    let x = ((42) | 0);\n    let s = \"hi\";\n})();\n"
    );
}

#[test]
fn test_integer_truncation() {
    let code = compile("int a = 2147483649;\nuint b = -1;").unwrap();
    assert!(code.contains("let a = ((2147483649) | 0);"));
    assert!(code.contains("let b = (((-1) | 0) >>> 0);"));
}

#[test]
fn test_redeclaration_and_constants() {
    let errors = compile("int a = 1;\nint a = 2;").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_category(), ErrorCategory::SyntaxError);

    let errors = compile("const int a = 1;\na = 2;").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_category(), ErrorCategory::SyntaxError);
}

#[test]
fn test_container_assignability() {
    let errors = compile("array<number> a = [1];\narray<string> b = a;").unwrap_err();
    assert_eq!(errors[0].get_category(), ErrorCategory::TypeError);

    compile("array<any> a = [];\narray<string> b = a;").unwrap();
    compile("array<number> a = [1];\nany b = a;").unwrap();
}

#[test]
fn test_non_boolean_conditions() {
    for source in [
        "int n = 1;\nif (n) {\n  n = 2;\n}",
        "string s = \"\";\nwhile (s) {\n  s = \"x\";\n}",
    ] {
        let errors = compile(source).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].get_category(), ErrorCategory::TypeError);
        assert_eq!(errors[0].get_line(), 2);
    }
}

#[test]
fn test_compile_function() {
    let code = compile("func int add() { int a = 1; int b = 2; return a + b; }").unwrap();
    assert!(code.contains("    function add() {\n        let a = ((1) | 0);\n"));
    assert!(code.contains("        return (((a + b)) | 0);\n    }\n"));
}

#[test]
fn test_split_gives_string_array() {
    let source = "string s = \"hi\";\narray arr = s.split(\"\");\nstring first = arr[0];\nnumber n = arr.length;";
    let code = compile(source).unwrap();
    assert!(code.contains("let arr = s.split(\"\");"));
}

#[test]
fn test_duplicate_import() {
    let dir = imports_dir("duplicate", &[("io.hsc", IO_MODULE)]);
    let output = compile_source("import \"io.hsc\";\nimport \"io.hsc\";", &options(dir));

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_category(), ErrorCategory::ReferenceError);
    assert_eq!(output.errors[0].get_line(), 2);
    assert!(output.errors[0].get_message().starts_with("Cannot import twice"));
}

#[test]
fn test_missing_semicolon() {
    let errors = compile("int a = 1;\nint b = 2\nint c = 3;").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_category(), ErrorCategory::SyntaxError);
    assert_eq!(errors[0].get_line(), 2);
    assert_eq!(errors[0].get_error_name(), "MissingSemicolon");
}

#[test]
fn test_import_module() {
    let dir = imports_dir("module", &[("io.hsc", IO_MODULE)]);
    let source = "import \"io.hsc\";\nio.print(\"a\", 1, true);\nstring v = io.version;\nstring answer = await io.ask(\"name?\");";
    let output = compile_source(source, &options(dir));
    assert!(output.errors.is_empty(), "{:?}", output.errors);

    let code = output.code;
    assert!(code.starts_with(
        "(async () => {\n// Embedded imports\nconst io = (() => {\nfunction print(...args) { console.log(...args); }\n"
    ));
    assert!(code.contains("return { print, ask, version: \"1.0\" };\n})();\n"));
    assert!(code.contains("    io.print(\"a\", 1, true);\n"));
    assert!(code.contains("    let v = io.version;\n"));
    assert!(code.contains("    let answer = (await io.ask(\"name?\"));\n"));
}

#[test]
fn test_module_errors() {
    let dir = imports_dir("module_errors", &[("io.hsc", IO_MODULE)]);
    let options = options(dir);

    let output = compile_source("import \"io.hsc\";\nio.write(1);", &options);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_error_name(), "UnknownModuleMember");

    let output = compile_source("import \"io.hsc\";\nio.ask(1);", &options);
    assert_eq!(output.errors[0].get_error_name(), "ArgumentType");

    let output = compile_source("import \"io.hsc\";\nint io = 1;", &options);
    assert_eq!(output.errors[0].get_error_name(), "AlreadyDeclared");

    let output = compile_source("import \"io.hsc\";\nio = 1;", &options);
    assert_eq!(output.errors[0].get_error_name(), "ConstantModified");
}

#[test]
fn test_unawaited_async_module_call() {
    let dir = imports_dir("unawaited", &[("io.hsc", IO_MODULE)]);
    let output = compile_source(
        "import \"io.hsc\";\nany pending = io.ask(\"x\");\nint n = io.ask(\"x\");",
        &options(dir),
    );
    assert!(output.errors.is_empty(), "{:?}", output.errors);
}

#[test]
fn test_custom_return_module() {
    let module = "{ \"module\": \"math\", \"customReturn\": \"api\", \"functions\": [{ \"name\": \"double\", \"params\": [\"number\"], \"returns\": \"number\" }] }\n---\nconst api = { double: (n) => n * 2 };\n";
    let dir = imports_dir("custom_return", &[("math.hsc", module)]);
    let output = compile_source(
        "import \"math.hsc\";\nnumber n = math.double(4);",
        &options(dir),
    );
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    assert!(output.code.contains("return api;\n})();\n"));
    assert!(output.code.contains("let n = math.double(4);"));
}

#[test]
fn test_broken_import_code_fails_output_check() {
    let module = "{ \"module\": \"bad\" }\n---\nfunction broken() {\n";
    let dir = imports_dir("broken", &[("bad.hsc", module)]);
    let output = compile_source("import \"bad.hsc\";", &options(dir.clone()));

    assert!(output.code.is_empty());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_category(), ErrorCategory::OutputCheckError);

    let mut unchecked = options(dir);
    unchecked.check_output = false;
    let output = compile_source("import \"bad.hsc\";", &unchecked);
    assert!(output.errors.is_empty());
}

#[test]
fn test_invalid_custom_return_fails_output_check() {
    let module = "{ \"module\": \"obj\", \"customReturn\": \"{ a: }\" }\n---\n";
    let dir = imports_dir("bad_return", &[("obj.hsc", module)]);
    let output = compile_source("import \"obj.hsc\";", &options(dir));

    assert!(output.code.is_empty());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_category(), ErrorCategory::OutputCheckError);
    assert_eq!(output.errors[0].get_line(), 4);
}

#[test]
fn test_invalid_module_name() {
    let dir = imports_dir("bad_name", &[("m.hsc", "{ \"module\": \"my-mod\" }\n---\n")]);
    let output = compile_source("import \"m.hsc\";", &options(dir));
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_category(), ErrorCategory::ImportError);
    assert_eq!(output.errors[0].get_error_name(), "InvalidImportName");
}

#[test]
fn test_invalid_import_file() {
    let dir = imports_dir("invalid", &[("bad.hsc", "{ \"module\": \"bad\" }\n")]);
    let output = compile_source("import \"bad.hsc\";", &options(dir));
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_category(), ErrorCategory::ImportError);
    assert_eq!(output.errors[0].get_error_name(), "MissingSeparator");
}

#[test]
fn test_else_branches() {
    let source = "number n = 3;\nstring size = \"\";\nif (n > 10) {\n  size = \"big\";\n} else if (n > 2) {\n  size = \"medium\";\n} else {\n  size = \"small\";\n}";
    let code = compile(source).unwrap();
    assert!(code.contains(
        "    if ((n > 10)) {\n        size = \"big\";\n    } else if ((n > 2)) {\n        size = \"medium\";\n    } else {\n        size = \"small\";\n    }\n"
    ));
}

#[test]
fn test_while_loop() {
    let code = compile("int i = 0;\nwhile (i < 3) {\n  i += 1;\n}").unwrap();
    assert!(code.contains("    while ((i < 3)) {\n        i = (((i + (1))) | 0);\n    }\n"));
}

#[test]
fn test_recursive_function() {
    let source = "func int fib(int n) {\n  if (n < 2) {\n    return n;\n  }\n  return fib(n - 1) + fib(n - 2);\n}\nint f = fib(10);";
    let code = compile(source).unwrap();
    assert!(code.contains("return (((fib((n - 1)) + fib((n - 2)))) | 0);"));
}

#[test]
fn test_errors_are_collected() {
    let errors = compile("string s = 1;\nint n = \"a\";\nfoo();").unwrap_err();
    let lines: Vec<usize> = errors.iter().map(|e| e.get_line()).collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn test_comments_are_ignored() {
    let code = compile("// a comment\nint a = 1; /* block\ncomment */\nint b = a;").unwrap();
    assert!(code.contains("let b = ((a) | 0);"));
}
