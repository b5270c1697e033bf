//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No blocking sleeps in production code (the runtime must keep ticking)
//! - No blocking HTTP client
//! - The widget core stays free of terminal UI crates
//!
//! Helpers here walk the production sources of each workspace crate. Lines
//! after the first `#[cfg(test)]` and comment lines are not production code.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Workspace crates whose `src/` is production code
pub const PRODUCTION_CRATES: &[&str] = &["core", "tui"];

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the match
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.text)
    }
}

/// Root of the workspace this package lives in
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Every `.rs` file under `<crate>/src`
#[must_use]
pub fn production_sources(crate_name: &str) -> Vec<PathBuf> {
    let src = workspace_root().join(crate_name).join("src");
    let mut files: Vec<PathBuf> = WalkDir::new(src)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
        .collect();
    files.sort();
    files
}

/// Numbered production lines of one source file
pub fn production_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(index, line)| (index + 1, line))
}

/// Occurrences of `pattern` in the production code of `crates`
#[must_use]
pub fn find_pattern(crates: &[&str], pattern: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    for crate_name in crates {
        for file in production_sources(crate_name) {
            let Ok(source) = fs::read_to_string(&file) else {
                continue;
            };
            for (line, text) in production_lines(&source) {
                if text.contains(pattern) {
                    violations.push(Violation {
                        file: file.clone(),
                        line,
                        text: text.trim().to_string(),
                    });
                }
            }
        }
    }
    violations
}

/// Assert that `pattern` never appears in production code
///
/// # Panics
///
/// Panics listing every violation.
pub fn assert_absent(pattern: &str, reason: &str) {
    let violations = find_pattern(PRODUCTION_CRATES, pattern);
    assert!(
        violations.is_empty(),
        "{reason}: found `{pattern}` in production code:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "fn a() {}\n// std::thread::sleep in a comment\n#[cfg(test)]\nmod tests {}\n";
        let lines: Vec<_> = production_lines(source).collect();
        assert_eq!(lines, vec![(1, "fn a() {}")]);
    }

    #[test]
    fn test_workspace_crates_are_found() {
        for crate_name in PRODUCTION_CRATES {
            assert!(
                !production_sources(crate_name).is_empty(),
                "no sources for {crate_name}"
            );
        }
    }
}
