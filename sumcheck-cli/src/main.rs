//! sumcheck CLI - exhaustiveness checker for sealed-interface sum types.
//!
//! Reads semantic snapshots written by a front-end (files, or directories
//! searched recursively) and reports every type switch that misses a
//! variant of a declared sum type.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use sumcheck_core::{
    init_structured_logging, load_config, print_json, print_plain, AnalysisResult, LogFormat,
    Sumcheck, SumcheckConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Exhaustiveness checker for sealed-interface sum types")]
pub struct Cli {
    /// Snapshot files or directories to search for *.json snapshots
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Tool prefix of the declaration marker (`//<PREFIX>:decl T`)
    #[arg(long, value_name = "PREFIX")]
    marker: Option<String>,

    /// Call that never returns; a default arm made of one is not a catch-all.
    /// Repeatable, replaces the configured list.
    #[arg(long = "abort", value_name = "NAME")]
    abort: Vec<String>,

    /// File base name the declaration scanner skips. Repeatable.
    #[arg(long = "exclude-file", value_name = "NAME")]
    exclude_file: Vec<String>,

    /// Analyze units one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Log format on stderr
    #[arg(long, value_parser = ["json", "compact"], default_value = "json")]
    log_format: String,
}

impl Cli {
    fn log_format(&self) -> LogFormat {
        match self.log_format.as_str() {
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }

    /// Config file values first, flags on top.
    fn checker(&self, file: Option<&SumcheckConfig>) -> Sumcheck {
        let mut checker = Sumcheck::new(self.paths.iter().cloned());
        if let Some(cfg) = file {
            checker = checker.with_config(cfg);
        }
        if let Some(marker) = &self.marker {
            checker = checker.marker(marker.clone());
        }
        if !self.abort.is_empty() {
            checker = checker.abort_functions(self.abort.iter().cloned());
        }
        checker
            .exclude_files(self.exclude_file.iter().cloned())
            .parallel(!self.sequential)
    }

    fn wants_json(&self, file: Option<&SumcheckConfig>) -> bool {
        self.json || file.is_some_and(SumcheckConfig::wants_json)
    }
}

fn exit_code(result: &AnalysisResult) -> i32 {
    if result.is_clean() {
        0
    } else {
        1
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] sumcheck internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    let cli = Cli::parse();
    init_structured_logging(cli.log_format());

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let file_config = load_config(&cwd)?;

    let result = cli
        .checker(file_config.as_ref())
        .analyze()
        .context("Analysis failed")?;

    if result.snapshot_count == 0 {
        eprintln!("[WARN] no snapshots matched the given paths");
        std::process::exit(0);
    }

    if cli.wants_json(file_config.as_ref()) {
        print_json(&result);
    } else {
        print_plain(&result);
    }

    std::process::exit(exit_code(&result));
}
