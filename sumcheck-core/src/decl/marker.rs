//! Lexical matching of sum type declaration markers.
//!
//! A marker is a whole line of the form
//!
//! ```text
//! //go-sumtype:decl TypeName
//! ```
//!
//! anchored at the start of the line, with one or more whitespace characters
//! before the name and optional trailing whitespace. Nothing else may appear
//! on the line.

use regex::Regex;

use crate::config::AnalysisConfig;
use crate::error::{SumcheckError, SumcheckResult};

/// A compiled marker pattern for one comment leader and tool prefix.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    /// `//go-sumtype:decl`, checked before running the regex.
    leader: String,
    re: Regex,
}

impl MarkerPattern {
    pub fn new(comment: &str, marker: &str) -> SumcheckResult<Self> {
        if marker.trim().is_empty() {
            return Err(SumcheckError::invalid_argument("marker prefix must not be empty"));
        }
        let leader = format!("{}{}:decl", comment, marker);
        let pattern = format!(
            r"^{}\s+([\p{{L}}_][\p{{L}}\p{{N}}_]*)\s*$",
            regex::escape(&leader)
        );
        let re = Regex::new(&pattern).map_err(|e| {
            SumcheckError::invalid_argument(format!("invalid marker '{}': {}", leader, e))
        })?;
        Ok(Self { leader, re })
    }

    pub fn from_config(config: &AnalysisConfig) -> SumcheckResult<Self> {
        Self::new(&config.comment, &config.marker)
    }

    /// The fixed text every marker line starts with.
    pub fn leader(&self) -> &str {
        &self.leader
    }

    /// The declared type name if `line` is a marker.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !self.is_candidate(line) {
            return None;
        }
        self.re
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Cheap prefix test: the leader followed by whitespace.
    fn is_candidate(&self, line: &str) -> bool {
        line.strip_prefix(self.leader.as_str())
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_whitespace)
    }

    /// Every marker in `text`, as `(line number, type name)` pairs.
    /// Line numbers are 1-indexed.
    pub fn scan<'a>(&self, text: &'a str) -> Vec<(u32, &'a str)> {
        text.lines()
            .enumerate()
            .filter_map(|(idx, line)| self.parse_line(line).map(|name| (idx as u32 + 1, name)))
            .collect()
    }
}
