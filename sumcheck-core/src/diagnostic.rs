//! Findings reported about the analyzed code.
//!
//! Diagnostics are plain values: they carry their position and all the text
//! needed to render them, so the aggregator never has to look anything up.

use serde::Serialize;
use std::fmt;

use crate::decl::Declaration;
use crate::model::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The declared name has no symbol in the module scope.
    NotFound { decl: Declaration },
    /// The declared name is not a capability-set (interface) type.
    NotInterface { decl: Declaration },
    /// The interface declares no module-private method, so its variant set
    /// is open.
    Unsealed { decl: Declaration },
    /// A match site over a sum type misses some variants.
    Inexhaustive {
        pos: Position,
        sum_type: Declaration,
        /// Alphabetically sorted.
        missing: Vec<String>,
    },
    /// A source file could not be read for markers.
    UnreadableSource {
        pos: Position,
        file: String,
        error: String,
    },
}

impl Diagnostic {
    /// Where the diagnostic is reported.
    pub fn position(&self) -> &Position {
        match self {
            Diagnostic::NotFound { decl }
            | Diagnostic::NotInterface { decl }
            | Diagnostic::Unsealed { decl } => &decl.pos,
            Diagnostic::Inexhaustive { pos, .. } | Diagnostic::UnreadableSource { pos, .. } => pos,
        }
    }

    /// Stable machine-readable name of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::NotFound { .. } => "not_found",
            Diagnostic::NotInterface { .. } => "not_interface",
            Diagnostic::Unsealed { .. } => "unsealed",
            Diagnostic::Inexhaustive { .. } => "inexhaustive",
            Diagnostic::UnreadableSource { .. } => "unreadable_source",
        }
    }

    /// Missing variant names of an `Inexhaustive` diagnostic.
    pub fn missing(&self) -> &[String] {
        match self {
            Diagnostic::Inexhaustive { missing, .. } => missing,
            _ => &[],
        }
    }

    /// The message text, without position.
    pub fn message(&self) -> String {
        match self {
            Diagnostic::NotFound { decl } => {
                format!("type '{}' is not defined", decl.type_name)
            }
            Diagnostic::NotInterface { decl } => {
                format!("type '{}' is not an interface", decl.type_name)
            }
            Diagnostic::Unsealed { decl } => format!(
                "interface '{}' is not sealed (sealing requires at least one module-private method)",
                decl.type_name
            ),
            Diagnostic::Inexhaustive {
                sum_type, missing, ..
            } => format!(
                "exhaustiveness check failed for sum type '{}': missing cases for {}",
                sum_type.type_name,
                missing.join(", ")
            ),
            Diagnostic::UnreadableSource { file, error, .. } => {
                format!("unknown error reading file '{}': {}", file, error)
            }
        }
    }
}

/// Renders as `<file>:<line>: <message>`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position(), self.message())
    }
}
