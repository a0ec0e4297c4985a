//! Compilation unit snapshot: one module's files, symbols and types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::syntax::{Expr, Position, Stmt};
use super::types::{TypeId, TypeTable};

/// What a module-scope name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// A type name (defined type or alias).
    Type,
    /// A variable or constant.
    Value,
    Func,
}

/// An entry of the module-scope symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The declared type. For an alias this is the aliased type itself.
    pub ty: TypeId,
    #[serde(default)]
    pub pos: Option<Position>,
}

impl Symbol {
    pub fn is_type(&self) -> bool {
        self.kind == SymbolKind::Type
    }
}

/// A source file of the unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as the front-end reported it. Used verbatim in diagnostics.
    pub path: String,
    /// Embedded raw text. When absent the file is read from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Generated by tooling (interop stubs and the like); never scanned.
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = body;
        self
    }

    /// Last path component, e.g. `main.go` for `cmd/main.go`.
    pub fn base_name(&self) -> &str {
        self.path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.path.as_str())
    }

    pub fn root_position(&self) -> Position {
        Position::file_start(self.path.clone())
    }

    /// The raw source text: embedded text if present, otherwise the file read
    /// from disk (relative paths are resolved against `root`).
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the marker scan only
    /// cares about ASCII-prefixed lines.
    pub fn source_text(&self, root: Option<&Path>) -> std::io::Result<Cow<'_, str>> {
        if let Some(text) = &self.text {
            return Ok(Cow::Borrowed(text));
        }
        let bytes = std::fs::read(self.disk_path(root))?;
        Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn disk_path(&self, root: Option<&Path>) -> PathBuf {
        let path = Path::new(&self.path);
        match root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Everything the core needs about one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Module identity.
    pub module: String,
    /// Directory relative file paths are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub types: TypeTable,
    /// Module scope, in declaration order.
    #[serde(default)]
    pub scope: Vec<Symbol>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl CompilationUnit {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Looks a name up in the module scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scope.iter().find(|s| s.name == name)
    }

    /// Type-name symbols in declaration order.
    pub fn type_names(&self) -> impl Iterator<Item = &Symbol> {
        self.scope.iter().filter(|s| s.is_type())
    }

    /// Checks that the type table and every symbol only reference known types.
    pub fn validate(&self) -> Result<(), String> {
        self.types.validate()?;
        for sym in &self.scope {
            if !self.types.contains(sym.ty) {
                return Err(format!(
                    "symbol '{}' references unknown type {}",
                    sym.name, sym.ty
                ));
            }
        }
        Ok(())
    }
}

/// Static-type query over expression nodes.
pub trait TypeQuery {
    fn type_of(&self, expr: &Expr) -> Option<TypeId>;
}

impl TypeQuery for CompilationUnit {
    fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        expr.ty.filter(|ty| self.types.contains(*ty))
    }
}
