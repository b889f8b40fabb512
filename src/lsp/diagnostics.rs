//! Convert KPL and Blitz diagnostics to LSP diagnostics
//!
//! Syntax-layer positions are 1-based `(line, column)` pairs counted in characters; LSP positions are 0-based.

use kpl_syntax::diagnostics::{Diagnostic, Severity};
use tower_lsp::lsp_types::{self, DiagnosticSeverity, Position, Range};

/// Convert a 1-based line/column to a 0-based LSP position
pub fn to_position(line: usize, column: usize) -> Position {
    Position::new(
        line.saturating_sub(1) as u32,
        column.saturating_sub(1) as u32,
    )
}

/// Convert an LSP position back to a 1-based line/column
pub fn from_position(position: Position) -> (usize, usize) {
    (position.line as usize + 1, position.character as usize + 1)
}

/// Single-line range covering `length` characters from a 1-based position
pub fn to_range(line: usize, column: usize, length: usize) -> Range {
    let start = to_position(line, column);
    let end = Position::new(start.line, start.character + length.max(1) as u32);
    Range::new(start, end)
}

fn to_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    }
}

/// Convert a syntax-layer diagnostic to an LSP diagnostic
pub fn to_lsp_diagnostic(diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: to_range(diagnostic.line, diagnostic.column, diagnostic.length),
        severity: Some(to_severity(diagnostic.severity)),
        source: Some("kpl".to_string()),
        message: match &diagnostic.help {
            Some(help) => format!("{}\n\n{}", diagnostic.message, help),
            None => diagnostic.message.clone(),
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_become_zero_based() {
        let pos = to_position(1, 1);
        assert_eq!((pos.line, pos.character), (0, 0));

        let pos = to_position(3, 7);
        assert_eq!((pos.line, pos.character), (2, 6));

        assert_eq!(from_position(Position::new(2, 6)), (3, 7));
    }

    #[test]
    fn test_range_spans_length() {
        let range = to_range(2, 5, 4);
        assert_eq!(range.start, Position::new(1, 4));
        assert_eq!(range.end, Position::new(1, 8));

        let empty = to_range(1, 1, 0);
        assert_eq!(empty.end, Position::new(0, 1));
    }

    #[test]
    fn test_lsp_diagnostic_fields() {
        let d = Diagnostic::warning("Unknown directive '.foo'", 4, 2, 4);
        let lsp = to_lsp_diagnostic(&d);
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(lsp.source.as_deref(), Some("kpl"));
        assert_eq!(lsp.message, "Unknown directive '.foo'");
        assert_eq!(lsp.range.start, Position::new(3, 1));
    }

    #[test]
    fn test_lsp_message_carries_help() {
        let d = Diagnostic::error("Unterminated string", 1, 5, 3).with_help("hint: Close the string with '\"'");
        let lsp = to_lsp_diagnostic(&d);
        assert_eq!(lsp.message, "Unterminated string\n\nhint: Close the string with '\"'");
    }
}
