//! Structured logging using **tracing**.
//!
//! The core emits events through `tracing` macros; the CLI installs one of
//! the subscribers below on stderr so stdout stays reserved for diagnostics.

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analysis::UnitReport;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "sumcheck_core=warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, for log collectors.
    #[default]
    Json,
    /// Compact human-readable lines.
    Compact,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes the global tracing collector (subscriber).
///
/// Call once at startup. A second call is a no-op.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=sumcheck_core=debug`)
pub fn init_structured_logging(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    // try_init: a subscriber may already be installed (tests, embedding tools).
    let _ = match format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}

/// Records the outcome of one unit's analysis.
pub fn log_unit_summary(report: &UnitReport) {
    info!(
        module = %report.module,
        declarations = report.declarations,
        definitions = report.definitions,
        match_sites = report.match_sites,
        diagnostics = report.diagnostics.len(),
        "unit analyzed"
    );
}

/// Records a snapshot that could not be loaded.
pub fn log_load_failure(path: &Path, error: &str) {
    warn!(path = %path.display(), error = %error, "snapshot skipped");
}
