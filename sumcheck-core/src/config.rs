//! Configuration loading from sumcheck.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{IoResultExt, SumcheckError};
use crate::model::SourceFile;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "sumcheck.toml";

/// Tool prefix of the declaration marker: `//go-sumtype:decl T`.
pub const DEFAULT_MARKER: &str = "go-sumtype";
pub const DEFAULT_COMMENT: &str = "//";
pub const DEFAULT_ABORT_FUNCTIONS: &[&str] = &["panic"];
/// Base names of files that are never scanned (the fake cgo file).
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["C"];

/// Main configuration structure for sumcheck.toml.
#[derive(Debug, Deserialize, Default)]
pub struct SumcheckConfig {
    /// Tool prefix of the declaration marker.
    pub marker: Option<String>,
    /// Line-comment leader preceding the marker.
    pub comment: Option<String>,
    /// Calls that never return; a fallback arm consisting of one is terminal.
    pub abort_functions: Option<Vec<String>>,
    /// File base names skipped by the declaration scanner.
    pub exclude_files: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl SumcheckConfig {
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from sumcheck.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<SumcheckConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| SumcheckError::config(&path, e.message()))
        .context("Invalid sumcheck.toml")?;
    Ok(Some(cfg))
}

/// Settings every analysis stage reads, with all defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub marker: String,
    pub comment: String,
    pub abort_functions: Vec<String>,
    pub exclude_files: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            abort_functions: DEFAULT_ABORT_FUNCTIONS.iter().map(|s| s.to_string()).collect(),
            exclude_files: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    /// Overlays the values present in a config file on the defaults.
    pub fn from_file(cfg: &SumcheckConfig) -> Self {
        let mut out = Self::default();
        if let Some(marker) = &cfg.marker {
            out.marker = marker.clone();
        }
        if let Some(comment) = &cfg.comment {
            out.comment = comment.clone();
        }
        if let Some(list) = &cfg.abort_functions {
            out.abort_functions = list.clone();
        }
        if let Some(list) = &cfg.exclude_files {
            out.exclude_files = list.clone();
        }
        out
    }

    /// Whether the declaration scanner must skip `file`.
    pub fn is_excluded(&self, file: &SourceFile) -> bool {
        file.generated || self.exclude_files.iter().any(|n| n == file.base_name())
    }

    pub fn is_abort_function(&self, name: &str) -> bool {
        self.abort_functions.iter().any(|f| f == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg: SumcheckConfig = toml::from_str(
            r##"
marker = "sumtype"
comment = "#"
abort_functions = ["panic", "fatal"]
exclude_files = ["C", "zz_generated.go"]

[output]
format = "json"
"##,
        )
        .unwrap();
        assert!(cfg.wants_json());

        let analysis = AnalysisConfig::from_file(&cfg);
        assert_eq!(analysis.marker, "sumtype");
        assert_eq!(analysis.comment, "#");
        assert!(analysis.is_abort_function("fatal"));
        assert!(analysis.is_excluded(&SourceFile::new("pkg/zz_generated.go")));
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let cfg: SumcheckConfig = toml::from_str("marker = \"x\"").unwrap();
        let analysis = AnalysisConfig::from_file(&cfg);
        assert_eq!(analysis.marker, "x");
        assert_eq!(analysis.comment, "//");
        assert_eq!(analysis.abort_functions, vec!["panic".to_string()]);
        assert!(!cfg.wants_json());
    }

    #[test]
    fn test_generated_files_are_excluded() {
        let config = AnalysisConfig::default();
        let mut file = SourceFile::new("stub.go");
        assert!(!config.is_excluded(&file));
        file.generated = true;
        assert!(config.is_excluded(&file));
        assert!(config.is_excluded(&SourceFile::new("/tmp/build/C")));
    }

    #[test]
    fn test_load_config_absent() {
        let dir = std::env::temp_dir().join(format!("sumcheck_cfg_absent_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert!(load_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_invalid() {
        let dir = std::env::temp_dir().join(format!("sumcheck_cfg_invalid_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "marker = [").unwrap();
        let err = load_config(&dir).unwrap_err();
        match err.downcast_ref::<SumcheckError>() {
            Some(SumcheckError::Config { path, .. }) => assert_eq!(path, &dir.join(CONFIG_FILE)),
            other => panic!("expected a config error, got {:?}", other),
        }
        fs::remove_dir_all(&dir).ok();
    }
}
