//! Declaration scanning: finds the types a module marks as sum types.
//!
//! Scanning is purely lexical. It runs over the raw text of every source file
//! of a unit, so files the front-end could not fully parse still contribute
//! their markers, and it never consults the syntax tree.
//!
//! # Example
//!
//! ```ignore
//! use sumcheck_core::decl::{find_declarations, MarkerPattern};
//!
//! let marker = MarkerPattern::from_config(&config)?;
//! let scan = find_declarations(&unit, &config, &marker);
//! for decl in &scan.declarations {
//!     println!("{} declared at {}", decl.type_name, decl.pos);
//! }
//! ```

pub mod marker;

pub use marker::MarkerPattern;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::diagnostic::Diagnostic;
use crate::model::{CompilationUnit, Position, SourceFile};

/// A request to treat a type as a sum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// Module that owns the marker.
    pub module: String,
    /// The type named by the marker.
    pub type_name: String,
    /// Position of the named type, or the start of the marker's file when the
    /// name does not resolve.
    pub pos: Position,
}

/// Result of scanning one unit.
#[derive(Debug, Clone, Default)]
pub struct DeclarationScan {
    pub declarations: Vec<Declaration>,
    /// `UnreadableSource` diagnostics for files whose text was unavailable.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans every non-excluded file of `unit` for markers.
///
/// An unreadable file yields a diagnostic and no declarations; the remaining
/// files are still scanned.
pub fn find_declarations(
    unit: &CompilationUnit,
    config: &AnalysisConfig,
    marker: &MarkerPattern,
) -> DeclarationScan {
    let mut scan = DeclarationScan::default();

    for file in &unit.files {
        if config.is_excluded(file) {
            debug!(file = %file.path, "skipping excluded file");
            continue;
        }

        let text = match file.source_text(unit.root.as_deref()) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file.path, error = %e, "cannot read source file");
                scan.diagnostics.push(Diagnostic::UnreadableSource {
                    pos: file.root_position(),
                    file: file.path.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        for (line, type_name) in marker.scan(&text) {
            debug!(file = %file.path, line, type_name, "found sum type marker");
            scan.declarations.push(declaration(unit, file, type_name));
        }
    }

    scan
}

fn declaration(unit: &CompilationUnit, file: &SourceFile, type_name: &str) -> Declaration {
    let pos = unit
        .lookup(type_name)
        .and_then(|sym| sym.pos.clone())
        .unwrap_or_else(|| file.root_position());
    Declaration {
        module: unit.module.clone(),
        type_name: type_name.to_string(),
        pos,
    }
}
