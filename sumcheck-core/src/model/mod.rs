//! Semantic snapshot of a compilation unit.
//!
//! The checker never parses or type-checks source code. A front-end resolves
//! each compilation unit and hands over a [`CompilationUnit`]:
//!
//! ```text
//! ┌──────────────────────┐
//! │   CompilationUnit    │
//! │  ──────────────────  │
//! │  module identity     │
//! │  TypeTable (types)   │──▶ identity, method sets, conformance
//! │  scope (symbols)     │──▶ name lookup, variant candidates
//! │  files (syntax)      │──▶ markers, type switches
//! └──────────────────────┘
//! ```
//!
//! Units are plain data (`serde`), so a front-end in any language can emit
//! them as JSON; see [`crate::snapshot`].

pub mod builder;
pub mod syntax;
pub mod types;
pub mod unit;
pub mod visit;

pub use builder::UnitBuilder;
pub use syntax::{CaseClause, Expr, ExprKind, Position, Stmt, SwitchHeader, TypeSwitch};
pub use types::{Field, Method, MethodSig, Receiver, Type, TypeId, TypeTable, Visibility};
pub use unit::{CompilationUnit, SourceFile, Symbol, SymbolKind, TypeQuery};
pub use visit::{type_switches, Visit};
