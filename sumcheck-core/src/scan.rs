//! Parallel, deterministic snapshot discovery with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel entry filtering via Rayon's `par_bridge`
//! - Sorted output, so runs are reproducible regardless of thread timing

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never searched for snapshots.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules"];

/// Extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "json";

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn is_snapshot(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SNAPSHOT_EXTENSION)
}

/// Gathers every snapshot file below `root`, sorted by path.
///
/// Automatically skips `target/`, `.git/` and `node_modules/`.
pub fn gather_snapshot_files(root: &Path) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && is_snapshot(path) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather snapshots from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Expands command-line inputs into snapshot files.
///
/// Files are taken as given, whatever their extension, and directories are
/// searched recursively. Order follows `inputs`; duplicates are dropped.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let found = if input.is_dir() {
            gather_snapshot_files(input)?
        } else if input.exists() {
            vec![input.clone()]
        } else {
            anyhow::bail!("No such file or directory: {}", input.display());
        };
        for file in found {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}
