//! Builder pattern API for sumcheck analysis.
//!
//! Provides a fluent interface for configuring and running a check over
//! snapshot files:
//!
//! ```rust,ignore
//! use sumcheck_core::prelude::*;
//!
//! let result = Sumcheck::new(["build/snapshots"])
//!     .abort_functions(["panic", "fatal"])
//!     .parallel(true)
//!     .analyze()?;
//!
//! for diag in result.diagnostics() {
//!     println!("{}", diag);
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::{Checker, UnitReport};
use crate::config::{AnalysisConfig, SumcheckConfig};
use crate::diagnostic::Diagnostic;
use crate::logging::log_load_failure;
use crate::scan::collect_inputs;
use crate::snapshot::{load_snapshots, LoadResult};

/// Builder for configuring a sum type check.
#[derive(Debug, Clone)]
pub struct Sumcheck {
    /// Snapshot files or directories to search
    inputs: Vec<PathBuf>,

    config: AnalysisConfig,

    /// Analyze units on the rayon pool
    parallel: bool,
}

impl Sumcheck {
    pub fn new(inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            config: AnalysisConfig::default(),
            parallel: true,
        }
    }

    /// Overlays a loaded `sumcheck.toml`. Call before the other setters so
    /// they take precedence.
    pub fn with_config(mut self, file: &SumcheckConfig) -> Self {
        self.config = AnalysisConfig::from_file(file);
        self
    }

    /// Tool prefix of the declaration marker.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.config.marker = marker.into();
        self
    }

    /// Replaces the calls treated as never returning. Names match bare
    /// identifier callees only; a qualified call such as `log.Fatal(...)` is
    /// never terminal.
    pub fn abort_functions(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.abort_functions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds file base names the scanner skips.
    pub fn exclude_files(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config
            .exclude_files
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs the analysis.
    ///
    /// Fails only on bad inputs or configuration. Snapshots that cannot be
    /// loaded are reported in [`AnalysisResult::failures`].
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Expand inputs
        let files = collect_inputs(&self.inputs).context("Failed to collect snapshot files")?;
        let snapshot_count = files.len();

        // 2. Load snapshots, keeping failures
        let mut units = Vec::new();
        let mut failures = Vec::new();
        for loaded in load_snapshots(&files) {
            match loaded {
                LoadResult::Ok(_, unit) => units.push(unit),
                LoadResult::Skipped(path, err) => {
                    let error = err.to_string();
                    log_load_failure(&path, &error);
                    failures.push(LoadFailure { path, error });
                }
            }
        }

        // 3. Check every unit
        let checker = Checker::new(self.config.clone()).context("Invalid analysis configuration")?;
        let reports = checker.analyze_all(&units, self.parallel);

        Ok(AnalysisResult {
            reports,
            failures,
            snapshot_count,
        })
    }
}

/// A snapshot that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of a check run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// One report per loaded unit, in input order.
    pub reports: Vec<UnitReport>,

    pub failures: Vec<LoadFailure>,

    /// Snapshot files matched by the inputs, loaded or not.
    pub snapshot_count: usize,
}

impl AnalysisResult {
    /// Every diagnostic, units in input order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter().flat_map(|r| r.diagnostics.iter())
    }

    pub fn diagnostic_count(&self) -> usize {
        self.reports.iter().map(|r| r.diagnostics.len()).sum()
    }

    /// No diagnostics and no load failures.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.reports.iter().all(UnitReport::is_clean)
    }
}
