//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use sumcheck_core::prelude::*;
//! ```

// Snapshot model
pub use crate::model::{CompilationUnit, Position, SourceFile, TypeId, UnitBuilder};

// Pipeline stages
pub use crate::analysis::{Checker, UnitReport};
pub use crate::check::check_unit;
pub use crate::decl::{find_declarations, Declaration, MarkerPattern};
pub use crate::def::{find_definitions, Definition};
pub use crate::diagnostic::Diagnostic;

// Errors and configuration
pub use crate::config::{load_config, AnalysisConfig, SumcheckConfig};
pub use crate::error::{SumcheckError, SumcheckResult};

// Builder API
pub use crate::builder::{AnalysisResult, LoadFailure, Sumcheck};
