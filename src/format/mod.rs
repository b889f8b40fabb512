//! Blitz Assembly Formatter
//!
//! Line-based: every source line is formatted on its own, so formatting never fails and never needs a parse.
//! Conventions:
//! - One tab before mnemonics and directives, one tab between mnemonic and operands
//! - Labels and constant definitions at column 1; a label sharing its line with code gets split off
//! - Trailing `!` comments aligned to column 49 with 8-wide tab stops

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;

/// A replacement for one source line (0-based), produced only for lines that change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub line: usize,
    pub original: String,
    /// May span two lines, joined by `\n`.
    pub replacement: String,
}

/// Format one line with default settings
pub fn format_line(line: &str) -> Vec<String> {
    Formatter::new(FormatConfig::default()).format_line(line)
}

/// Format a sequence of lines with default settings
pub fn format_lines(lines: &[&str]) -> Vec<String> {
    Formatter::new(FormatConfig::default()).format_lines(lines.iter().copied())
}

/// Format Blitz source with default settings
pub fn format_source(source: &str) -> String {
    format_source_with_config(source, FormatConfig::default())
}

/// Format Blitz source with custom configuration
#[tracing::instrument(skip_all, fields(bytes = source.len()))]
pub fn format_source_with_config(source: &str, config: FormatConfig) -> String {
    let formatter = Formatter::new(config);
    let mut out = formatter.format_lines(source.lines()).join("\n");
    if source.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Per-line edits that turn `source` into its formatted form
pub fn format_edits(source: &str) -> Vec<LineEdit> {
    format_edits_with_config(source, FormatConfig::default())
}

pub fn format_edits_with_config(source: &str, config: FormatConfig) -> Vec<LineEdit> {
    let formatter = Formatter::new(config);
    source
        .lines()
        .enumerate()
        .filter_map(|(line, original)| {
            let replacement = formatter.format_line(original).join("\n");
            (replacement != original).then(|| LineEdit {
                line,
                original: original.to_string(),
                replacement,
            })
        })
        .collect()
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> bool {
    format_source(source) == source
}

/// Get the diff between original and formatted source, or `None` if nothing changes
pub fn format_diff(source: &str) -> Option<String> {
    let edits = format_edits(source);
    if edits.is_empty() {
        return None;
    }

    let mut diff = String::new();
    for edit in &edits {
        let number = edit.line + 1;
        diff.push_str(&format!("-{number:4} | {}\n", edit.original));
        for new_line in edit.replacement.lines() {
            diff.push_str(&format!("+{number:4} | {new_line}\n"));
        }
    }
    Some(diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSY: &str = "Loop: add r1,r2,r3 ! sum\n  jmp Loop\n";

    #[test]
    fn test_format_source() {
        insta::assert_snapshot!(format_source(MESSY).trim_end().replace('\t', "→"), @r"
        Loop:
        →add→r1,r2,r3→→→! sum
        →jmp→Loop
        ");
    }

    #[test]
    fn test_format_source_keeps_trailing_newline_state() {
        assert_eq!(format_source("ret"), "\tret");
        assert_eq!(format_source("ret\n"), "\tret\n");
        assert_eq!(format_source(""), "");
    }

    #[test]
    fn test_format_source_with_config() {
        let config = FormatConfig::new().with_comment_column(25);
        assert_eq!(format_source_with_config("nop ! idle", config), "\tnop\t\t! idle");
    }

    #[test]
    fn test_check_formatted() {
        assert!(!check_formatted(MESSY));
        assert!(check_formatted(&format_source(MESSY)));
    }

    #[test]
    fn test_format_edits_only_touch_changed_lines() {
        let source = "\tnop\n  ret\n";
        let edits = format_edits(source);
        assert_eq!(
            edits,
            vec![LineEdit {
                line: 1,
                original: "  ret".to_string(),
                replacement: "\tret".to_string(),
            }]
        );
    }

    #[test]
    fn test_format_diff() {
        assert!(format_diff("\tnop\n").is_none());
        insta::assert_snapshot!(format_diff("L: nop\n").unwrap().trim_end().replace('\t', "→"), @r"
        -   1 | L: nop
        +   1 | L:
        +   1 | →nop
        ");
    }

    #[test]
    fn test_format_lines() {
        assert_eq!(format_lines(&["A: ret", "! c"]), vec!["A:", "\tret", "! c"]);
    }
}
