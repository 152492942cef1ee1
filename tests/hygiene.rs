//! Hygiene: coding standards enforced at test time.
//!
//! Scans the engine's production sources (`src/`, minus `*_test.rs`) for
//! patterns the crate does without. Continuous input paths clamp or no-op and
//! structural calls return `EngineError`, so every panic budget is zero.
//! Output goes through `tracing`, never straight to stdout/stderr.

use std::fs;
use std::path::{Path, PathBuf};

/// `(pattern, budget, why)`. Budgets only ever go down.
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "aborts the host"),
    ("unreachable!(", 0, "aborts the host"),
    ("todo!(", 0, "unfinished code"),
    ("unimplemented!(", 0, "unfinished code"),
    ("let _ =", 0, "silently discards a result"),
    (".ok()", 0, "silently discards an error"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
    ("println!(", 0, "use tracing"),
    ("eprintln!(", 0, "use tracing"),
    ("dbg!(", 0, "debug leftovers"),
];

/// Modules without a sibling `_test.rs`: declarations only.
const UNTESTED_MODULES: &[&str] = &["lib.rs", "consts.rs", "error.rs"];

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn production_sources() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

/// Count matching lines per file, ignoring `//` comment lines.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.display().to_string(), count))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = production_sources();
    assert!(
        files.iter().any(|f| f.path.ends_with("engine.rs")),
        "hygiene scan must run from the crate root"
    );
}

#[test]
fn pattern_budgets() {
    let files = production_sources();
    let mut failures = Vec::new();
    for &(pattern, budget, why) in BUDGETS {
        let found = hits(&files, pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget {
            let detail: Vec<String> = found.iter().map(|(p, c)| format!("    {p}: {c}")).collect();
            failures.push(format!("  `{pattern}` ({why}): found {count}, max {budget}\n{}", detail.join("\n")));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn modules_have_sibling_tests() {
    let missing: Vec<String> = production_sources()
        .iter()
        .filter_map(|f| {
            let name = f.path.file_name()?.to_string_lossy().to_string();
            if UNTESTED_MODULES.contains(&name.as_str()) {
                return None;
            }
            let sibling = f.path.with_file_name(name.replace(".rs", "_test.rs"));
            (!sibling.exists()).then_some(name)
        })
        .collect();
    assert!(missing.is_empty(), "modules without a `_test.rs` sibling: {missing:?}");
}

#[test]
fn test_modules_are_wired_in() {
    let unwired: Vec<String> = production_sources()
        .iter()
        .filter_map(|f| {
            let name = f.path.file_name()?.to_string_lossy().to_string();
            let test_file = name.replace(".rs", "_test.rs");
            let sibling = f.path.with_file_name(&test_file);
            let wired = f.content.contains(&format!("#[path = \"{test_file}\"]"));
            (sibling.exists() && !wired).then_some(name)
        })
        .collect();
    assert!(unwired.is_empty(), "`_test.rs` files never compiled: {unwired:?}");
}
