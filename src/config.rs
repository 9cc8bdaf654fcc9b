//! Compiler configuration.

use std::{env, path::PathBuf};

/// Environment variable overriding the default imports directory.
pub const IMPORTS_DIR_VAR: &str = "HSC_IMPORTS_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Directory that relative import paths are resolved against.
    pub imports_dir: PathBuf,
    /// Replaces `~/` at the start of an import path.
    pub home_dir: Option<PathBuf>,
    /// Run the structural check over the generated JavaScript.
    pub check_output: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        let home_dir = home_dir();
        let imports_dir = match env::var_os(IMPORTS_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir
                .clone()
                .unwrap_or_default()
                .join("huopascript")
                .join("imports"),
        };

        CompileOptions {
            imports_dir,
            home_dir,
            check_output: true,
        }
    }
}

impl CompileOptions {
    pub fn with_imports_dir(mut self, imports_dir: PathBuf) -> Self {
        self.imports_dir = imports_dir;
        self
    }

    /// Where the literal import path `path` points on disk.
    ///
    /// `~/x` is resolved against the home directory, absolute paths are kept
    /// and everything else is relative to the imports directory.
    pub fn resolve_import_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = &self.home_dir {
                return home.join(rest);
            }
        }

        let path_buf = PathBuf::from(path);
        if path_buf.is_absolute() {
            path_buf
        } else {
            self.imports_dir.join(path_buf)
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
