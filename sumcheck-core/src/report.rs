//! Output formatting - plaintext and JSON.

use serde_json::{json, Value};

use crate::builder::AnalysisResult;

/// One `<file>:<line>: <message>` line per diagnostic, then one line per load
/// failure.
pub fn render_plain(result: &AnalysisResult) -> Vec<String> {
    result
        .diagnostics()
        .map(|d| d.to_string())
        .chain(
            result
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.path.display(), f.error)),
        )
        .collect()
}

pub fn print_plain(result: &AnalysisResult) {
    for line in render_plain(result) {
        println!("{}", line);
    }
}

pub fn to_json(result: &AnalysisResult) -> Value {
    let diagnostics: Vec<Value> = result
        .diagnostics()
        .map(|d| {
            let pos = d.position();
            json!({
                "file": pos.file,
                "line": pos.line,
                "kind": d.kind(),
                "message": d.message(),
            })
        })
        .collect();
    let failures: Vec<Value> = result
        .failures
        .iter()
        .map(|f| json!({ "path": f.path.display().to_string(), "error": f.error }))
        .collect();

    json!({ "diagnostics": diagnostics, "failures": failures })
}

/// Prints the result as a JSON document.
///
/// Falls back to the plain format if serialization fails.
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(&to_json(result)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(result);
        }
    }
}
