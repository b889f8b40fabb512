//! Diagnostics and error reporting for KPL and Blitz.
//!
//! Two layers:
//! - [`CompileError`]: what the lexer and parser produce. Carries a full [`Span`] plus the offending lexeme.
//! - [`Diagnostic`]: the closed `{severity, message, line, column, length}` record every producer (KPL lexer,
//!   KPL parser, Blitz symbol validation) is converted into before it leaves the syntax layer.
//!
//! ## Notes
//! - Lines and columns are **1-based** everywhere in this crate. Editor adapters convert at their boundary.
//! - [`SourceReport`] renders a [`Diagnostic`] with `miette` for terminal output.

use std::fmt;

use miette::{NamedSource, SourceSpan};

use crate::ast::Span;

/// An error produced while lexing or parsing, with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", header(.kind, .span, .found, .message))]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    /// Lexeme of the token the parser was looking at. `None` for lexical errors and at end of input.
    pub found: Option<String>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span, kind: ErrorKind) -> Self {
        Self {
            message,
            span,
            kind,
            found: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: String, span: Span) -> Self {
        Self::new(message, span, ErrorKind::Lexical)
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self::new(message, span, ErrorKind::Syntax)
    }

    pub fn with_found(mut self, lexeme: impl Into<String>) -> Self {
        self.found = Some(lexeme.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Notes then hints, one `note: ..` / `hint: ..` line each.
    pub fn help_text(&self) -> Option<String> {
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|note| format!("note: {note}"))
            .chain(self.hints.iter().map(|hint| format!("hint: {hint}")))
            .collect();
        if lines.is_empty() { None } else { Some(lines.join("\n")) }
    }

    /// Convert into the closed diagnostic record. `source` is the text the span indexes into; the length is
    /// counted in characters of that slice.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let severity = match self.kind {
            ErrorKind::Warning => Severity::Warning,
            _ => Severity::Error,
        };
        let length = source
            .get(self.span.start..self.span.end)
            .map(|text| text.chars().count())
            .unwrap_or_else(|| self.span.len());
        Diagnostic {
            severity,
            message: self.message.clone(),
            line: self.span.line,
            column: self.span.column,
            length: length.max(1),
            help: self.help_text(),
        }
    }
}

fn header(kind: &ErrorKind, span: &Span, found: &Option<String>, message: &str) -> String {
    let label = match kind {
        ErrorKind::Warning => "Warning",
        _ => "Error",
    };
    match (kind, found) {
        (ErrorKind::Syntax, Some(lexeme)) => {
            format!("[{}:{}] {} at '{}': {}", span.line, span.column, label, lexeme, message)
        }
        (ErrorKind::Syntax, None) => format!("[{}:{}] {} at end: {}", span.line, span.column, label, message),
        _ => format!("[{}:{}] {}: {}", span.line, span.column, label, message),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Symbol,
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Symbol => write!(f, "symbol error"),
            ErrorKind::Warning => write!(f, "warning"),
        }
    }
}

// ============================================================================
// Closed diagnostic record
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic shared by every KPL and Blitz validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Length of the highlighted range, in characters. Always at least 1.
    pub length: usize,
    /// Notes and hints shown under the message.
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self {
            severity,
            message: message.into(),
            line,
            column,
            length: length.max(1),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn error(message: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self::new(Severity::Error, message, line, column, length)
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self::new(Severity::Warning, message, line, column, length)
    }

    pub fn info(message: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self::new(Severity::Info, message, line, column, length)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.line, self.column, self.severity, self.message)
    }
}

/// Byte offset of a 1-based `(line, column)` position, clamped to the source.
pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            return line_start
                + text
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map(|(i, _)| i)
                    .unwrap_or(text.len());
        }
        line_start += text.len();
    }
    source.len()
}

// ============================================================================
// Terminal rendering
// ============================================================================

/// A diagnostic with source context, rendered by `miette`.
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(kpl::check))]
pub struct SourceReport {
    pub severity: Severity,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
    #[help]
    pub help: Option<String>,
}

impl SourceReport {
    pub fn from_diagnostic(diagnostic: &Diagnostic, source_path: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
            Severity::Info => "note",
        };
        let start = offset_of(source, diagnostic.line, diagnostic.column);
        let end = source[start..]
            .char_indices()
            .nth(diagnostic.length)
            .map(|(i, _)| start + i)
            .unwrap_or(source.len());

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.clone(),
            src: NamedSource::new(source_path, source.to_string()),
            span: (start, end - start).into(),
            label: label.to_string(),
            help: diagnostic.help.clone(),
        }
    }

    pub fn from_compile_error(error: &CompileError, source_path: &str, source: &str) -> Self {
        Self::from_diagnostic(&error.to_diagnostic(source), source_path, source)
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Lexical errors shared by the KPL lexer.
pub mod errors {
    use super::*;

    pub fn unexpected_character(c: char, span: Span) -> CompileError {
        CompileError::lexical(format!("Unexpected character: {}", c), span)
    }

    pub fn unterminated_string(span: Span) -> CompileError {
        CompileError::lexical("Unterminated string".to_string(), span).with_hint("Close the string with '\"'")
    }

    pub fn empty_char(span: Span) -> CompileError {
        CompileError::lexical("Empty character literal".to_string(), span)
    }

    pub fn unterminated_char(span: Span) -> CompileError {
        CompileError::lexical("Unterminated character literal".to_string(), span)
            .with_note("A character literal holds exactly one character or one escape")
    }

    pub fn invalid_escape(c: char, span: Span) -> CompileError {
        CompileError::lexical(format!("Invalid escape sequence '\\{}'", c), span)
            .with_hint("Valid escapes are \\n \\t \\r \\\\ \\' \\\" \\0 and \\xHH")
    }

    pub fn unterminated_comment(span: Span) -> CompileError {
        CompileError::lexical("Unterminated multiline comment".to_string(), span)
            .with_note("Block comments nest; every '/*' needs its own '*/'")
    }

    pub fn integer_out_of_range(span: Span) -> CompileError {
        CompileError::lexical("Integer literal out of range".to_string(), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let lexical = errors::unexpected_character('~', Span::new(3, 4, 2, 7));
        assert_eq!(lexical.to_string(), "[2:7] Error: Unexpected character: ~");

        let syntax = CompileError::syntax("Expected 'endIf'".into(), Span::new(0, 5, 4, 1)).with_found("endOf");
        assert_eq!(syntax.to_string(), "[4:1] Error at 'endOf': Expected 'endIf'");

        let eof = CompileError::syntax("Expected 'endCode'".into(), Span::new(9, 9, 5, 1));
        assert_eq!(eof.to_string(), "[5:1] Error at end: Expected 'endCode'");
    }

    #[test]
    fn test_to_diagnostic_keeps_position() {
        let err = CompileError::syntax("boom".into(), Span::new(10, 13, 3, 4));
        let d = err.to_diagnostic("code T\n\n  abc");
        assert_eq!(d, Diagnostic::error("boom", 3, 4, 3));
        assert_eq!(d.to_string(), "3:4: error: boom");
    }

    #[test]
    fn test_offset_of() {
        let src = "ab\ncdé\nx";
        assert_eq!(offset_of(src, 1, 1), 0);
        assert_eq!(offset_of(src, 2, 2), 4);
        assert_eq!(offset_of(src, 3, 1), 8);
        assert_eq!(offset_of(src, 9, 1), src.len());
    }

    #[test]
    fn test_source_report_span() {
        let src = "code T\n  x = @\nendCode";
        let d = Diagnostic::error("Unexpected character: @", 2, 7, 1);
        let report = SourceReport::from_diagnostic(&d, "t.k", src);
        assert_eq!(report.span.offset(), 13);
        assert_eq!(report.span.len(), 1);
        assert_eq!(report.label, "error here");
    }

    #[test]
    fn test_length_counts_characters() {
        let source = "x = héllo";
        let err = CompileError::lexical("bad word".into(), Span::new(4, 10, 1, 5));
        assert_eq!(err.span.len(), 6);
        assert_eq!(err.to_diagnostic(source).length, 5);

        // Span outside the given text falls back to the byte width.
        assert_eq!(err.to_diagnostic("").length, 6);
    }

    #[test]
    fn test_notes_and_hints_become_help() {
        let err = errors::unterminated_comment(Span::new(0, 2, 1, 1)).with_hint("Add '*/'");
        assert_eq!(
            err.help_text().as_deref(),
            Some("note: Block comments nest; every '/*' needs its own '*/'\nhint: Add '*/'")
        );
        assert_eq!(errors::empty_char(Span::new(0, 2, 1, 1)).help_text(), None);
    }

    #[test]
    fn test_source_report_renders_hint() {
        let source = "\"abc\\q\"";
        let (_, errs) = crate::lexer::lex_with_errors(source);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].hints[0].starts_with("Valid escapes"));

        let report = SourceReport::from_compile_error(&errs[0], "t.k", source);
        assert!(report.help.as_deref().is_some_and(|h| h.starts_with("hint: Valid escapes")));
        let rendered = format!("{:?}", miette::Report::new(report));
        assert!(rendered.contains("Invalid escape sequence '\\q'"));
        assert!(rendered.contains("Valid escapes"));
    }

    #[test]
    fn test_parse_source_keeps_help() {
        let outcome = crate::parser::parse_source("code C\n  var c: char = '\nendCode");
        let d = outcome
            .diagnostics
            .iter()
            .find(|d| d.message == "Unterminated character literal")
            .expect("unterminated char is reported");
        assert!(d.help.as_deref().is_some_and(|h| h.contains("exactly one character")));
    }
}
