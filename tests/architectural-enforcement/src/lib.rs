//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles
//! on the production sources of `primer-core` and `primer-cli`:
//! - No thread-blocking sleeps; waiting goes through the tokio timer
//! - No blocking I/O inside async functions
//!
//! The scanning helpers live here so each rule in `tests/` stays short.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source trees checked by the enforcement tests
pub const PRODUCTION_DIRS: [&str; 2] = ["primer/core/src", "primer/cli/src"];

/// Workspace root, resolved from this package's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// One offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// The line, trimmed
    pub line: String,
    /// What rule it breaks
    pub reason: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line_number,
            self.reason,
            self.line
        )
    }
}

/// All `.rs` files under `dir`, sorted for stable reports
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Lines that ship in the binary: everything before the first `#[cfg(test)]`
#[must_use]
pub fn production_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
        .collect()
}

/// The code part of a line, without a trailing `//` comment
#[must_use]
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether the innermost enclosing `fn` above `current_idx` is `async`
#[must_use]
pub fn is_in_async_function(lines: &[&str], current_idx: usize) -> bool {
    for i in (0..=current_idx).rev() {
        let line = code_part(lines[i]).trim();
        if line.contains("fn ") && !line.starts_with("///") {
            return line.contains("async fn ");
        }

        // Stop at item boundaries
        if line.starts_with("impl ") || line.starts_with("mod ") {
            return false;
        }
    }
    false
}

/// Apply `check` to every production line under [`PRODUCTION_DIRS`]
///
/// `check` gets the file's production lines and the index of the line to
/// judge, and returns the reason when the line breaks a rule.
pub fn scan_production<F>(check: F) -> Vec<Violation>
where
    F: Fn(&[&str], usize) -> Option<&'static str>,
{
    let root = workspace_root();
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        let dir = root.join(dir);
        if !dir.exists() {
            continue;
        }
        for path in rust_sources(&dir) {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            let lines = production_lines(&content);
            for idx in 0..lines.len() {
                if let Some(reason) = check(&lines, idx) {
                    violations.push(Violation {
                        path: path.clone(),
                        line_number: idx + 1,
                        line: lines[idx].trim().to_string(),
                        reason,
                    });
                }
            }
        }
    }
    violations
}

/// Print violations and fail the test if there are any
///
/// # Panics
///
/// Panics when `violations` is not empty.
pub fn report(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s) in production code.\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let content = "fn a() {}\n#[cfg(test)]\nmod tests {\n    fn b() {}\n}\n";
        assert_eq!(production_lines(content), vec!["fn a() {}"]);
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // std::fs::read"), "let x = 1; ");
        assert_eq!(code_part("/// docs"), "");
    }

    #[test]
    fn test_async_function_detection() {
        let code = vec![
            "pub async fn fetch() {",
            "    let body = std::fs::read_to_string(path);",
            "}",
            "fn load() {",
            "    let body = std::fs::read_to_string(path);",
            "}",
        ];

        assert!(is_in_async_function(&code, 1));
        assert!(!is_in_async_function(&code, 4));
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
