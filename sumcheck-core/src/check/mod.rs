//! Match-site analysis: checks type switches over sum types for coverage.
//!
//! A type switch is checked when the static type of its scrutinee has an
//! underlying type identical to a sum type's interface. It is exhaustive
//! when every variant is listed by some arm, pointer indirection aside. A
//! fallback arm that provably aborts is treated as absent; one that can
//! return is a deliberate catch-all and suppresses the check.

pub mod site;

pub use site::{Fallback, MatchSite};

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::def::Definition;
use crate::diagnostic::Diagnostic;
use crate::model::{type_switches, CompilationUnit, TypeId, TypeQuery, TypeSwitch, TypeTable};

/// What checking one type switch concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// No sum type applies: unknown scrutinee type or not a sum type.
    NotSumType,
    /// Every variant is covered.
    Exhaustive,
    /// A catch-all arm handles the remaining variants.
    Suppressed,
    Inexhaustive(Diagnostic),
}

impl SiteOutcome {
    pub fn is_sum_type_site(&self) -> bool {
        !matches!(self, SiteOutcome::NotSumType)
    }

    pub fn into_diagnostic(self) -> Option<Diagnostic> {
        match self {
            SiteOutcome::Inexhaustive(diag) => Some(diag),
            _ => None,
        }
    }
}

/// Result of checking every match site of a unit.
#[derive(Debug, Clone, Default)]
pub struct UnitCheck {
    /// Type switches whose scrutinee is a sum type.
    pub match_sites: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The first definition whose interface is identical to the underlying type
/// of `ty`.
pub fn find_definition<'d>(
    types: &TypeTable,
    defs: &'d [Definition],
    ty: TypeId,
) -> Option<&'d Definition> {
    let underlying = types.underlying(ty);
    defs.iter()
        .find(|def| types.identical(underlying, def.interface.ty()))
}

/// Checks a single type switch against the unit's definitions.
pub fn check_switch(
    unit: &CompilationUnit,
    defs: &[Definition],
    switch: &TypeSwitch,
    config: &AnalysisConfig,
) -> SiteOutcome {
    let Some(scrutinee) = site::scrutinee(switch) else {
        return SiteOutcome::NotSumType;
    };
    let Some(ty) = unit.type_of(scrutinee) else {
        debug!(pos = %switch.pos, "scrutinee has no resolved type");
        return SiteOutcome::NotSumType;
    };
    let Some(def) = find_definition(&unit.types, defs, ty) else {
        return SiteOutcome::NotSumType;
    };

    let site = MatchSite::collect(unit, switch, ty, config);
    if site.suppresses_check() {
        debug!(pos = %site.pos, sum_type = %def.type_name(), "catch-all arm, not checked");
        return SiteOutcome::Suppressed;
    }

    let mut missing: Vec<String> = def
        .missing(&unit.types, &site.covered)
        .into_iter()
        .map(|v| v.name.clone())
        .collect();
    if missing.is_empty() {
        return SiteOutcome::Exhaustive;
    }
    missing.sort();

    SiteOutcome::Inexhaustive(Diagnostic::Inexhaustive {
        pos: site.pos,
        sum_type: def.decl.clone(),
        missing,
    })
}

/// Checks every type switch in every file of `unit`, nested ones included.
/// Diagnostics follow file order, then source order within a file.
pub fn check_unit(unit: &CompilationUnit, defs: &[Definition], config: &AnalysisConfig) -> UnitCheck {
    let mut result = UnitCheck::default();
    if defs.is_empty() {
        return result;
    }

    for file in &unit.files {
        for switch in type_switches(file) {
            let outcome = check_switch(unit, defs, switch, config);
            if outcome.is_sum_type_site() {
                result.match_sites += 1;
            }
            result.diagnostics.extend(outcome.into_diagnostic());
        }
    }

    result
}
