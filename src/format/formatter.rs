//! Line rules for Blitz assembly
//!
//! Each source line is classified on its own and re-emitted:
//!
//! | Line                  | Output                                           |
//! |-----------------------|--------------------------------------------------|
//! | blank                 | empty                                            |
//! | `! comment`           | comment at column 1                              |
//! | `Label:`              | label at column 1                                |
//! | `Label: add r1,r2,r3` | label line, then the instruction on its own line |
//! | `NAME = expr`         | `NAME = expr` at column 1                        |
//! | anything else         | tab, mnemonic or directive, tab, operands        |
//!
//! A trailing comment on any of these is moved to the configured comment column.

use kpl_syntax::blitz::lexer::comment_start;

use super::config::FormatConfig;
use super::writer::LineWriter;

/// Formatter that re-lays out Blitz source line by line
pub struct Formatter {
    config: FormatConfig,
}

enum LineShape<'a> {
    Blank,
    Comment(&'a str),
    Label { label: &'a str, rest: Option<&'a str> },
    Constant { name: &'a str, expr: &'a str },
    Statement(&'a str),
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    /// Format one source line into one line, or two when a label shares its line with code
    pub fn format_line(&self, line: &str) -> Vec<String> {
        let (code, comment) = split_comment(line);
        match classify(code) {
            LineShape::Blank => match comment {
                Some(comment) => vec![comment.to_string()],
                None => vec![String::new()],
            },
            LineShape::Comment(text) => vec![text.to_string()],
            LineShape::Label { label, rest: None } => vec![self.finish(label, comment)],
            LineShape::Label { label, rest: Some(rest) } => {
                vec![label.to_string(), self.finish(&statement(rest), comment)]
            }
            LineShape::Constant { name, expr } => vec![self.finish(&format!("{name} = {expr}"), comment)],
            LineShape::Statement(code) => vec![self.finish(&statement(code), comment)],
        }
    }

    pub fn format_lines<'l>(&self, lines: impl IntoIterator<Item = &'l str>) -> Vec<String> {
        lines.into_iter().flat_map(|line| self.format_line(line)).collect()
    }

    fn finish(&self, code: &str, comment: Option<&str>) -> String {
        let mut writer = LineWriter::new(&self.config);
        writer.write(code);
        if let Some(comment) = comment {
            writer.tab_to(self.config.comment_column.saturating_sub(1));
            writer.write(comment);
        }
        writer.finish()
    }
}

/// Split off a trailing `!` comment; both halves are trimmed.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match comment_start(line) {
        Some(idx) => (line[..idx].trim(), Some(line[idx..].trim())),
        None => (line.trim(), None),
    }
}

fn classify(code: &str) -> LineShape<'_> {
    if code.is_empty() {
        return LineShape::Blank;
    }
    if code.starts_with('!') {
        return LineShape::Comment(code);
    }

    let ident_len = code
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(code.len());
    if ident_len > 0 && code.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        let after = &code[ident_len..];
        if let Some(rest) = after.strip_prefix(':') {
            let rest = rest.trim();
            return LineShape::Label {
                label: &code[..=ident_len],
                rest: (!rest.is_empty()).then_some(rest),
            };
        }
        match after.trim_start().strip_prefix('=') {
            Some(expr) if !expr.starts_with('=') => {
                return LineShape::Constant {
                    name: &code[..ident_len],
                    expr: expr.trim(),
                };
            }
            _ => {}
        }
    }

    LineShape::Statement(code)
}

/// `\t` mnemonic, then `\t` operands if there are any.
fn statement(code: &str) -> String {
    match code.split_once(char::is_whitespace) {
        Some((head, operands)) => format!("\t{head}\t{}", operands.trim()),
        None => format!("\t{code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(line: &str) -> Vec<String> {
        Formatter::new(FormatConfig::default()).format_line(line)
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(fmt("   \t "), vec![""]);
        assert_eq!(fmt("    ! just a comment  "), vec!["! just a comment"]);
    }

    #[test]
    fn test_instruction_is_tab_indented() {
        assert_eq!(fmt("add   r1,r2,r3"), vec!["\tadd\tr1,r2,r3"]);
        assert_eq!(fmt("      ret"), vec!["\tret"]);
        assert_eq!(fmt(" .text"), vec!["\t.text"]);
    }

    #[test]
    fn test_label_alone_and_with_code() {
        assert_eq!(fmt("   Loop:"), vec!["Loop:"]);
        assert_eq!(fmt("Loop: sub r1,1,r1"), vec!["Loop:", "\tsub\tr1,1,r1"]);
    }

    #[test]
    fn test_comment_aligned_to_column_49() {
        let out = fmt("add r1,r2,r3 ! sum");
        assert_eq!(out, vec!["\tadd\tr1,r2,r3\t\t\t! sum"]);

        let out = fmt("Loop: ! top of loop");
        assert_eq!(out, vec!["Loop:\t\t\t\t\t\t! top of loop"]);
    }

    #[test]
    fn test_comment_after_long_code_gets_one_tab() {
        let code = format!("add {}", "x".repeat(60));
        let out = fmt(&format!("{code} ! note"));
        assert!(out[0].ends_with("\t! note"));
        assert!(!out[0].ends_with("\t\t! note"));
    }

    #[test]
    fn test_bang_inside_string_is_not_a_comment() {
        assert_eq!(fmt(".ascii  \"Hi!\""), vec!["\t.ascii\t\"Hi!\""]);
    }

    #[test]
    fn test_constant_definition() {
        assert_eq!(fmt("  SIZE=0x100"), vec!["SIZE = 0x100"]);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let formatter = Formatter::new(FormatConfig::default());
        for line in ["Loop: sub r1,1,r1 ! dec", "  .word 5", "X = 3 ! three", "! c", ""] {
            let once = formatter.format_lines([line]);
            let twice = formatter.format_lines(once.iter().map(String::as_str));
            assert_eq!(once, twice, "{line:?}");
        }
    }
}
