//! Per-unit pipeline: scanner, then resolver, then match-site analyzer.

use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::check::check_unit;
use crate::config::AnalysisConfig;
use crate::decl::{find_declarations, MarkerPattern};
use crate::def::find_definitions;
use crate::diagnostic::Diagnostic;
use crate::error::SumcheckResult;
use crate::logging::log_unit_summary;
use crate::model::CompilationUnit;

/// Everything one unit produced.
#[derive(Debug, Clone, Default)]
pub struct UnitReport {
    pub module: String,
    pub declarations: usize,
    pub definitions: usize,
    /// Type switches over a resolved sum type.
    pub match_sites: usize,
    /// Scanner diagnostics, then declaration-level, then match-site-level.
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs the three stages over compilation units.
#[derive(Debug, Clone)]
pub struct Checker {
    config: AnalysisConfig,
    marker: MarkerPattern,
}

impl Checker {
    pub fn new(config: AnalysisConfig) -> SumcheckResult<Self> {
        let marker = MarkerPattern::from_config(&config)?;
        Ok(Self { config, marker })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes one unit. Never fails: every problem becomes a diagnostic.
    pub fn analyze(&self, unit: &CompilationUnit) -> UnitReport {
        let span = info_span!("unit", module = %unit.module);
        let _guard = span.enter();

        let scan = find_declarations(unit, &self.config, &self.marker);
        let mut report = UnitReport {
            module: unit.module.clone(),
            declarations: scan.declarations.len(),
            diagnostics: scan.diagnostics,
            ..UnitReport::default()
        };

        if scan.declarations.is_empty() {
            debug!("no sum type declarations");
            log_unit_summary(&report);
            return report;
        }

        let (defs, decl_diagnostics) = find_definitions(unit, &scan.declarations);
        report.definitions = defs.len();
        report.diagnostics.extend(decl_diagnostics);

        if !defs.is_empty() {
            let checked = check_unit(unit, &defs, &self.config);
            report.match_sites = checked.match_sites;
            report.diagnostics.extend(checked.diagnostics);
        }

        log_unit_summary(&report);
        report
    }

    /// Analyzes every unit, in parallel when `parallel` is set. Reports are
    /// returned in input order either way.
    pub fn analyze_all(&self, units: &[CompilationUnit], parallel: bool) -> Vec<UnitReport> {
        if parallel {
            units.par_iter().map(|unit| self.analyze(unit)).collect()
        } else {
            units.iter().map(|unit| self.analyze(unit)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Receiver, SourceFile, Stmt, TypeSwitch, UnitBuilder};

    fn checker() -> Checker {
        Checker::new(AnalysisConfig::default()).unwrap()
    }

    /// Module `name` with sum type `T = A | B` and one switch covering only `A`.
    fn unit(name: &str, marker: &str) -> CompilationUnit {
        let mut b = UnitBuilder::new(name);
        let sealed = b.private_method("sealed");
        let t = b.interface("T", vec![sealed.clone()]);
        for v in ["A", "B"] {
            let ty = b.struct_type(v);
            b.method(ty, Receiver::Pointer, sealed.clone());
        }
        let a = b.symbol_type("A").unwrap();
        let case = b.pointer_expr(a);
        let sw = TypeSwitch::on(Position::new("main.go", 20), b.value_expr(t)).case(vec![case], vec![]);
        b.file(
            SourceFile::new("main.go")
                .with_text(marker)
                .with_body(vec![Stmt::TypeSwitch(sw)]),
        );
        b.build()
    }

    #[test]
    fn test_full_pipeline() {
        let report = checker().analyze(&unit("p", "//go-sumtype:decl T\n"));
        assert_eq!(report.declarations, 1);
        assert_eq!(report.definitions, 1);
        assert_eq!(report.match_sites, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].missing(), ["B"]);
    }

    #[test]
    fn test_no_declarations_skips_checking() {
        let report = checker().analyze(&unit("p", "package p\n"));
        assert_eq!(report.declarations, 0);
        assert_eq!(report.match_sites, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_declaration_diagnostics_precede_site_diagnostics() {
        let report = checker().analyze(&unit("p", "//go-sumtype:decl Nope\n//go-sumtype:decl T\n"));
        let kinds: Vec<&str> = report.diagnostics.iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec!["not_found", "inexhaustive"]);
    }

    #[test]
    fn test_parallel_keeps_input_order() {
        let units: Vec<CompilationUnit> = (0..16)
            .map(|i| unit(&format!("m{}", i), "//go-sumtype:decl T\n"))
            .collect();
        let c = checker();
        let parallel: Vec<String> = c.analyze_all(&units, true).into_iter().map(|r| r.module).collect();
        let sequential: Vec<String> = c.analyze_all(&units, false).into_iter().map(|r| r.module).collect();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[3], "m3");
    }

    #[test]
    fn test_invalid_marker_rejected() {
        let mut config = AnalysisConfig::default();
        config.marker = String::new();
        assert!(Checker::new(config).is_err());
    }
}
