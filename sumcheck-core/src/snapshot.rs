//! Loading of semantic snapshots written by a front-end.
//!
//! A snapshot is one JSON-encoded [`CompilationUnit`]. Loading is lenient:
//! a snapshot that cannot be read or decoded is skipped with its error so the
//! remaining units are still analyzed.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, SumcheckError, SumcheckResult};
use crate::model::CompilationUnit;

/// Maximum snapshot size to load (256 MB).
const MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Outcome of loading one snapshot.
#[derive(Debug)]
pub enum LoadResult {
    Ok(PathBuf, CompilationUnit),
    Skipped(PathBuf, SumcheckError),
}

/// Decodes and validates snapshot text. `path` is only used for errors.
pub fn parse_snapshot(text: &str, path: &Path) -> SumcheckResult<CompilationUnit> {
    let unit: CompilationUnit = serde_json::from_str(text).map_err(|e| {
        SumcheckError::snapshot_at(path, e.to_string(), e.line(), e.column())
    })?;
    unit.validate()
        .map_err(|message| SumcheckError::snapshot(path, message))?;
    Ok(unit)
}

/// Reads one snapshot from disk.
///
/// A unit without an explicit `root` resolves relative source paths against
/// the snapshot's directory.
pub fn load_snapshot(path: &Path) -> SumcheckResult<CompilationUnit> {
    let size = fs::metadata(path).with_path(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(SumcheckError::snapshot(
            path,
            format!("file too large ({} bytes, max {})", size, MAX_FILE_SIZE),
        ));
    }

    let text = fs::read_to_string(path).with_path(path)?;
    let mut unit = parse_snapshot(&text, path)?;
    if unit.root.is_none() {
        unit.root = path.parent().map(Path::to_path_buf);
    }
    Ok(unit)
}

/// Loads one snapshot, keeping a failure as a value.
pub fn load_single_snapshot(path: &Path) -> LoadResult {
    match load_snapshot(path) {
        Ok(unit) => LoadResult::Ok(path.to_path_buf(), unit),
        Err(e) => LoadResult::Skipped(path.to_path_buf(), e),
    }
}

/// Loads every snapshot in parallel. Results keep the order of `files`.
pub fn load_snapshots(files: &[PathBuf]) -> Vec<LoadResult> {
    files
        .par_iter()
        .map(|path| load_single_snapshot(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Receiver, SourceFile, Stmt, TypeSwitch, UnitBuilder};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sumcheck_snapshot_{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_unit() -> CompilationUnit {
        let mut b = UnitBuilder::new("example.com/shapes");
        let sealed = b.private_method("sealed");
        let t = b.interface("Shape", vec![sealed.clone()]);
        let sq = b.struct_type("Square");
        b.method(sq, Receiver::Pointer, sealed);
        let case = b.pointer_expr(sq);
        let sw = TypeSwitch::on(Position::new("shapes.go", 12), b.value_expr(t)).case(vec![case], vec![]);
        b.file(SourceFile::new("shapes.go").with_body(vec![Stmt::TypeSwitch(sw)]));
        b.build()
    }

    #[test]
    fn test_parse_hand_written_snapshot() {
        let text = r#"{
            "module": "p",
            "types": [
                { "kind": "interface", "methods": [
                    { "name": "sealed", "visibility": "private", "module": "p" }
                ] },
                { "kind": "named", "name": "T", "module": "p", "underlying": 0 },
                { "kind": "struct" },
                { "kind": "named", "name": "A", "module": "p", "underlying": 2,
                  "methods": [ { "name": "sealed", "visibility": "private", "module": "p", "receiver": "pointer" } ] }
            ],
            "scope": [
                { "name": "T", "kind": "type", "ty": 1 },
                { "name": "A", "kind": "type", "ty": 3 }
            ],
            "files": [ { "path": "a.go", "text": "//go-sumtype:decl T\n" } ]
        }"#;
        let unit = parse_snapshot(text, Path::new("a.json")).unwrap();
        assert_eq!(unit.module, "p");
        assert_eq!(unit.types.len(), 4);
        assert!(unit.lookup("A").is_some());
    }

    #[test]
    fn test_syntax_error_has_location() {
        let err = parse_snapshot("{\n  \"module\": }", Path::new("bad.json")).unwrap_err();
        match err {
            SumcheckError::Snapshot { line, column, .. } => {
                assert_eq!(line, Some(2));
                assert!(column.is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_type_reference_rejected() {
        let text = r#"{ "module": "p", "types": [], "scope": [ { "name": "T", "kind": "type", "ty": 7 } ] }"#;
        let err = parse_snapshot(text, Path::new("dangling.json")).unwrap_err();
        assert!(matches!(err, SumcheckError::Snapshot { line: None, .. }));
    }

    #[test]
    fn test_load_sets_root_to_snapshot_dir() {
        let dir = temp_dir("root");
        let path = dir.join("unit.json");
        fs::write(&path, serde_json::to_string(&sample_unit()).unwrap()).unwrap();

        let unit = load_snapshot(&path).unwrap();
        assert_eq!(unit.root.as_deref(), Some(dir.as_path()));
        assert_eq!(unit, {
            let mut expected = sample_unit();
            expected.root = Some(dir.clone());
            expected
        });
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_snapshots_keeps_failures_in_order() {
        let dir = temp_dir("batch");
        let good = dir.join("good.json");
        let bad = dir.join("bad.json");
        fs::write(&good, serde_json::to_string(&sample_unit()).unwrap()).unwrap();
        fs::write(&bad, "not json").unwrap();
        let missing = dir.join("missing.json");

        let results = load_snapshots(&[bad.clone(), good.clone(), missing.clone()]);
        assert!(matches!(&results[0], LoadResult::Skipped(p, SumcheckError::Snapshot { .. }) if *p == bad));
        assert!(matches!(&results[1], LoadResult::Ok(p, _) if *p == good));
        assert!(matches!(&results[2], LoadResult::Skipped(p, SumcheckError::Io { .. }) if *p == missing));
        fs::remove_dir_all(&dir).ok();
    }
}
