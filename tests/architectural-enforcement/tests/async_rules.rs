//! Async and layering rules for the production crates

use std::fs;

use architectural_enforcement::{assert_absent, find_pattern, workspace_root};

#[test]
fn test_no_blocking_sleep() {
    assert_absent(
        "std::thread::sleep",
        "use tokio::time::sleep or an interval inside async code",
    );
    assert_absent("thread::sleep(", "blocking sleep stalls the runtime");
}

#[test]
fn test_no_blocking_http_client() {
    assert_absent("reqwest::blocking", "the chat and probe calls must be async");
}

#[test]
fn test_no_nested_runtime() {
    assert_absent("block_on(", "never block on a future inside the runtime");
}

#[test]
fn test_core_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("core").join("Cargo.toml")).unwrap();
    for ui_crate in ["ratatui", "crossterm"] {
        assert!(
            !manifest.contains(ui_crate),
            "faqchat-core must not depend on {ui_crate}"
        );
    }
    let violations = find_pattern(&["core"], "ratatui");
    assert!(violations.is_empty(), "UI code belongs in faqchat-tui: {violations:?}");
}
