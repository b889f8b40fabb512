//! Layering guardrails for the workspace crates.
//!
//! `kpl_syntax` and `kpl_core` must stay usable without an async runtime or an editor: they may not list the
//! LSP/async stack (or the CLI stack) in their `[dependencies]`. `kpl_core` must stay dependency-free.

const FORBIDDEN_IN_SYNTAX: &[&str] = &["tokio", "tower-lsp", "clap", "serde_json"];

/// Dependency names listed under `[dependencies]` in a manifest.
fn dependency_names(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn syntax_crate_does_not_depend_on_editor_stack() {
    let names = dependency_names(include_str!("../crates/kpl_syntax/Cargo.toml"));
    assert!(names.iter().any(|n| n == "kpl_core"));
    for forbidden in FORBIDDEN_IN_SYNTAX {
        assert!(
            !names.iter().any(|n| n == forbidden),
            "`{forbidden}` must not appear in kpl_syntax [dependencies]"
        );
    }
}

#[test]
fn core_crate_has_no_dependencies() {
    let names = dependency_names(include_str!("../crates/kpl_core/Cargo.toml"));
    assert!(names.is_empty(), "kpl_core must stay dependency-free, found {names:?}");
}

#[test]
fn root_crate_uses_shared_frontend() {
    let names = dependency_names(include_str!("../Cargo.toml"));
    for required in ["kpl_core", "kpl_syntax", "tower-lsp", "tokio"] {
        assert!(names.iter().any(|n| n == required), "root crate should depend on `{required}`");
    }
}
