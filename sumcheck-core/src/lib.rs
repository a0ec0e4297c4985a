//! sumcheck-core: exhaustiveness checking for sum types emulated with sealed
//! interfaces.
//!
//! A module marks an interface as a sum type with a comment line:
//!
//! ```text
//! //go-sumtype:decl Shape
//! ```
//!
//! The interface must be *sealed* (declare at least one module-private
//! method), which closes its set of implementing types. Every type switch over
//! the interface is then required to list each variant, unless it has a real
//! catch-all arm.
//!
//! The core works on semantic snapshots: one JSON-encoded
//! [`CompilationUnit`] per module, written by a language front-end.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sumcheck_core::prelude::*;
//!
//! let result = Sumcheck::new(["snapshots/"]).analyze()?;
//! for diag in result.diagnostics() {
//!     println!("{}", diag);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: snapshot types, syntax tree and type identity
//! - [`decl`]: declaration marker scanning
//! - [`def`]: sealed interface resolution and variant enumeration
//! - [`check`]: match-site coverage analysis
//! - [`analysis`]: the per-unit pipeline
//! - [`snapshot`] and [`scan`]: loading and discovering snapshots
//! - [`builder`]: fluent builder API for configuration
//! - [`error`]: typed error handling

pub mod analysis;
pub mod builder;
pub mod check;
pub mod config;
pub mod decl;
pub mod def;
pub mod diagnostic;
pub mod error;
pub mod logging;
pub mod model;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod snapshot;

// Error types
pub use error::{IoResultExt, SumcheckError, SumcheckResult};

// Builder API
pub use builder::{AnalysisResult, LoadFailure, Sumcheck};

// Configuration
pub use config::{load_config, AnalysisConfig, OutputConfig, SumcheckConfig};

// Pipeline
pub use analysis::{Checker, UnitReport};
pub use check::{check_switch, check_unit, find_definition, Fallback, MatchSite, SiteOutcome};
pub use decl::{find_declarations, Declaration, DeclarationScan, MarkerPattern};
pub use def::{find_definitions, resolve, Definition, ResolveError, SealedInterface, Variant};
pub use diagnostic::Diagnostic;
pub use model::{CompilationUnit, TypeQuery, UnitBuilder};

// Logging
pub use logging::{init_structured_logging, LogFormat};

// Reporting
pub use report::{print_json, print_plain, render_plain, to_json};

// Snapshot loading and discovery
pub use scan::{collect_inputs, gather_snapshot_files};
pub use snapshot::{load_single_snapshot, load_snapshot, load_snapshots, parse_snapshot, LoadResult};
