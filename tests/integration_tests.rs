//! Integration tests for the KPL and Blitz pipelines

use std::fs;
use std::path::Path;

use kpl::format::{check_formatted, format_source};
use kpl::workspace::{SourceLanguage, Workspace, WorkspaceConfig};
use kpl_syntax::ast::{Declaration, FileUnit};
use kpl_syntax::blitz::{self, BlitzParser, BlitzTokenKind, SymbolKind};
use kpl_syntax::diagnostics::Severity;
use kpl_syntax::parser;

/// Run the language's full pipeline on a fixture and collect error messages
fn check_file(path: &Path) -> Result<(), Vec<String>> {
    let source = fs::read_to_string(path).map_err(|e| vec![e.to_string()])?;
    let language = SourceLanguage::from_path(path).ok_or_else(|| vec!["unknown extension".to_string()])?;
    let errors: Vec<String> = language
        .diagnose(&source)
        .into_iter()
        .filter(|d| d.is_error())
        .map(|d| d.to_string())
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Test that all valid fixtures check cleanly
#[test]
fn test_valid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/valid");
    let mut seen = 0;
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let path = entry.unwrap().path();
        if SourceLanguage::from_path(&path).is_some() {
            seen += 1;
            let result = check_file(&path);
            assert!(result.is_ok(), "Expected {} to check cleanly: {:?}", path.display(), result.err());
        }
    }
    assert_eq!(seen, 3);
}

/// Test that all invalid fixtures produce errors
#[test]
fn test_invalid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/invalid");
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let path = entry.unwrap().path();
        if SourceLanguage::from_path(&path).is_some() {
            assert!(check_file(&path).is_err(), "Expected {} to fail", path.display());
        }
    }
}

#[test]
fn test_workspace_checks_every_fixture() {
    let mut ws = Workspace::new(WorkspaceConfig::new("tests/fixtures"));
    assert_eq!(ws.refresh().unwrap(), 5);

    let failing: Vec<String> = ws
        .files()
        .into_iter()
        .filter(|path| check_file(path).is_err())
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(failing, vec!["Duplicate.s", "Unclosed.k"]);
}

// =============================================================================
// KPL
// =============================================================================

#[test]
fn test_kpl_end_to_end_example() {
    let outcome = parser::parse_source("code Test\n  function f() returns int\n    return 1\n  endFunction\nendCode");
    assert!(outcome.diagnostics.is_empty());
    let FileUnit::Code(code) = &outcome.program.units[0].node else {
        panic!("Expected code file");
    };
    assert_eq!(code.name, "Test");
    let Declaration::Function(f) = &code.declarations[0].node else {
        panic!("Expected function");
    };
    assert_eq!(f.name.as_deref(), Some("f"));
    assert!(f.params.is_empty());
    assert_eq!(f.body.len(), 1);
}

#[test]
fn test_kpl_header_and_code_parse_together() {
    let header = fs::read_to_string("tests/fixtures/valid/Lib.h").unwrap();
    let code = fs::read_to_string("tests/fixtures/valid/Impl.k").unwrap();
    let outcome = parser::parse_source(&format!("{header}\n{code}"));
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.program.units.len(), 2);
    assert!(matches!(outcome.program.units[0].node, FileUnit::Header(_)));
    assert!(matches!(outcome.program.units[1].node, FileUnit::Code(_)));
}

#[test]
fn test_kpl_errors_carry_positions() {
    let source = fs::read_to_string("tests/fixtures/invalid/Unclosed.k").unwrap();
    let outcome = parser::parse_source(&source);
    assert!(outcome.has_errors());
    for d in &outcome.diagnostics {
        assert!(d.line >= 1 && d.column >= 1, "{d}");
    }
}

// =============================================================================
// Blitz
// =============================================================================

#[test]
fn test_blitz_end_to_end_example() {
    let mut parser = BlitzParser::new();
    let result = parser.parse_text("L1: add r1,r2,r3\n jmp L1");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let labels: Vec<_> = result
        .tokens
        .iter()
        .filter(|t| t.text == "L1")
        .map(|t| (t.line, t.kind))
        .collect();
    assert_eq!(labels, vec![(1, BlitzTokenKind::Label), (2, BlitzTokenKind::Label)]);

    let symbol = parser.get_symbol("L1").unwrap();
    assert_eq!(symbol.kind, SymbolKind::Label);
    assert_eq!(symbol.definition.map(|d| d.line), Some(1));
    assert_eq!(symbol.references.len(), 1);
}

#[test]
fn test_blitz_fixture_symbols() {
    let source = fs::read_to_string("tests/fixtures/valid/Boot.s").unwrap();
    let mut parser = BlitzParser::new();
    let result = parser.parse_text(&source);
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    assert_eq!(parser.get_symbol("Start").unwrap().kind, SymbolKind::Export);
    assert_eq!(parser.get_symbol("Putc").unwrap().kind, SymbolKind::Import);
    assert_eq!(parser.get_symbol("STACK_TOP").unwrap().kind, SymbolKind::Constant);
    assert_eq!(parser.get_symbol("Loop").unwrap().references.len(), 1);
}

#[test]
fn test_blitz_duplicate_and_undefined() {
    let source = fs::read_to_string("tests/fixtures/invalid/Duplicate.s").unwrap();
    let result = blitz::parse_text(&source);
    let messages: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.severity, d.line, d.message.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            (Severity::Error, 3, "Label 'Start' is already defined at line 1, column 1"),
            (Severity::Error, 4, "Symbol 'Missing' is used but never defined"),
        ]
    );
}

#[test]
fn test_blitz_fixture_is_formatted() {
    let source = fs::read_to_string("tests/fixtures/valid/Boot.s").unwrap();
    assert!(check_formatted(&source), "{}", format_source(&source));
}
