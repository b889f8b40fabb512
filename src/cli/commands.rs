//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use kpl_syntax::blitz::BlitzParser;
use kpl_syntax::diagnostics::{Diagnostic, Severity, SourceReport};
use kpl_syntax::{lexer, parser};

use crate::format::{format_diff, format_source};
use crate::workspace::{SourceLanguage, Workspace, WorkspaceConfig};

use super::{CliError, CliResult, ExitCode, OutputFormat};

/// Maximum source file size (100 MB)
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path.display(), e)))
}

fn language_of(file_path: &Path) -> CliResult<SourceLanguage> {
    SourceLanguage::from_path(file_path).ok_or_else(|| {
        CliError::failure(format!(
            "Unrecognized source file '{}' (expected .k, .h or .s)",
            file_path.display()
        ))
    })
}

/// Render every diagnostic with source context, one report per diagnostic.
pub fn render_reports(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) -> String {
    let name = file_path.display().to_string();
    diagnostics
        .iter()
        .map(|d| format!("{:?}", miette::Report::new(SourceReport::from_diagnostic(d, &name, source))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fail_on_errors(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) -> CliResult<()> {
    if diagnostics.iter().any(Diagnostic::is_error) {
        return Err(CliError::failure(render_reports(file_path, source, diagnostics)));
    }
    Ok(())
}

/// Lex and display tokens.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    match language_of(file_path)? {
        SourceLanguage::Kpl => {
            let (tokens, errors) = lexer::lex_with_errors(&source);
            let diagnostics: Vec<Diagnostic> = errors.iter().map(|e| e.to_diagnostic(&source)).collect();
            fail_on_errors(file_path, &source, &diagnostics)?;
            for tok in &tokens {
                println!("{}:{}\t{:?}\t{}", tok.line(), tok.column(), tok.kind, tok.lexeme);
            }
        }
        SourceLanguage::Blitz => {
            let mut blitz = BlitzParser::new();
            for (idx, line) in source.lines().enumerate() {
                for tok in blitz.tokenize_line(line, idx + 1) {
                    println!("{}:{}\t{:?}\t{}", tok.line, tok.column, tok.kind, tok.text);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the AST (KPL) or the token list and symbol table (Blitz).
pub fn parse_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    match language_of(file_path)? {
        SourceLanguage::Kpl => {
            let mut outcome = parser::parse_source(&source);
            fail_on_errors(file_path, &source, &outcome.diagnostics)?;
            outcome.program.file = Some(file_path.display().to_string());
            println!("{:#?}", outcome.program);
        }
        SourceLanguage::Blitz => {
            let mut blitz = BlitzParser::new();
            let result = blitz.parse_text(&source);
            fail_on_errors(file_path, &source, &result.diagnostics)?;
            for tok in &result.tokens {
                println!("{}:{}\t{:?}\t{}", tok.line, tok.column, tok.kind, tok.text);
            }
            print!("{}", blitz.symbols().dump_state());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Report diagnostics for every source file under `path`.
///
/// Warnings are printed but do not fail the run.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn check_path(path: &Path, format: OutputFormat) -> CliResult<ExitCode> {
    let mut workspace = Workspace::new(WorkspaceConfig::new(path));
    workspace
        .refresh()
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    let files: Vec<PathBuf> = workspace.files().into_iter().map(Path::to_path_buf).collect();
    if files.is_empty() {
        return Err(CliError::failure(format!(
            "No .k, .h or .s files found in '{}'",
            path.display()
        )));
    }

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for file in &files {
        let (Some(language), Some(source)) = (SourceLanguage::from_path(file), workspace.file_content(file)) else {
            continue;
        };
        let diagnostics = language.diagnose(source);
        errors += diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        warnings += diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

        match format {
            OutputFormat::Text => {
                if !diagnostics.is_empty() {
                    eprintln!("{}", render_reports(file, source, &diagnostics));
                }
            }
            OutputFormat::Json => {
                for d in &diagnostics {
                    let json = serde_json::json!({
                        "file": file.display().to_string(),
                        "severity": d.severity.to_string(),
                        "message": d.message,
                        "line": d.line,
                        "column": d.column,
                        "length": d.length,
                        "help": d.help,
                    });
                    println!("{json}");
                }
            }
        }
    }

    if errors > 0 {
        return Err(CliError::failure(format!(
            "{} error(s), {} warning(s) in {} file(s)",
            errors,
            warnings,
            files.len()
        )));
    }
    if format == OutputFormat::Text {
        println!("✓ {} file(s) checked, {} warning(s)", files.len(), warnings);
    }
    Ok(ExitCode::SUCCESS)
}

/// Format Blitz assembly files.
pub fn format_files(path: &Path, check_mode: bool, diff_mode: bool) -> CliResult<ExitCode> {
    let workspace = Workspace::new(WorkspaceConfig::new(path).with_extensions(["s"]));
    let files = workspace
        .discover()
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    if files.is_empty() {
        return Err(CliError::failure("No .s files found"));
    }

    let mut needs_formatting = false;
    let mut formatted_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match read_source(file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e.message);
                error_count += 1;
                continue;
            }
        };

        let formatted = format_source(&source);
        let changed = source != formatted;

        if diff_mode && changed {
            println!("--- {}", file_path.display());
            if let Some(diff) = format_diff(&source) {
                print!("{}", diff);
            }
            println!();
        }

        if check_mode {
            if changed {
                println!("Would reformat: {}", file_path.display());
                needs_formatting = true;
            }
        } else if diff_mode {
            needs_formatting |= changed;
        } else if changed {
            if let Err(e) = fs::write(file_path, &formatted) {
                eprintln!("Error writing {}: {}", file_path.display(), e);
                error_count += 1;
            } else {
                println!("Formatted: {}", file_path.display());
                formatted_count += 1;
            }
        }
    }

    if check_mode || diff_mode {
        if needs_formatting {
            let msg = if diff_mode {
                "need formatting"
            } else {
                "would be reformatted"
            };
            return Err(CliError::failure(format!("\n{} file(s) {}", files.len(), msg)));
        }
        println!("✓ {} file(s) already formatted", files.len());
    } else {
        println!("\n✓ {} file(s) formatted, {} error(s)", formatted_count, error_count);
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kpl_cli_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/no/such/file.k")).unwrap_err();
        assert!(err.message.starts_with("Cannot access file '/no/such/file.k'"));
    }

    #[test]
    fn test_unrecognized_extension() {
        let dir = scratch_dir("ext");
        let file = dir.join("notes.txt");
        fs::write(&file, "hello").unwrap();
        let err = lex_file(&file).unwrap_err();
        assert!(err.message.contains("expected .k, .h or .s"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_check_path_clean_and_broken() {
        let dir = scratch_dir("check");
        fs::write(dir.join("Main.k"), "code Main\nendCode\n").unwrap();
        fs::write(dir.join("Boot.s"), "Start:\n\tjmp Start\n").unwrap();
        assert_eq!(check_path(&dir, OutputFormat::Json).unwrap(), ExitCode::SUCCESS);

        fs::write(dir.join("Bad.s"), "\tjmp Missing\n").unwrap();
        let err = check_path(&dir, OutputFormat::Json).unwrap_err();
        assert_eq!(err.message, "1 error(s), 0 warning(s) in 3 file(s)");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_check_path_empty_dir() {
        let dir = scratch_dir("empty");
        let err = check_path(&dir, OutputFormat::Text).unwrap_err();
        assert!(err.message.starts_with("No .k, .h or .s files found"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_format_files_check_then_write() {
        let dir = scratch_dir("fmt");
        let file = dir.join("Loop.s");
        fs::write(&file, "Loop: sub r1,1,r1\n  bne Loop\n").unwrap();

        assert!(format_files(&dir, true, false).is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "Loop: sub r1,1,r1\n  bne Loop\n");

        assert_eq!(format_files(&dir, false, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(fs::read_to_string(&file).unwrap(), "Loop:\n\tsub\tr1,1,r1\n\tbne\tLoop\n");
        assert_eq!(format_files(&dir, true, false).unwrap(), ExitCode::SUCCESS);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_reports_mentions_message() {
        let source = "\tjmp Missing\n";
        let diags = vec![Diagnostic::error("Symbol 'Missing' is used but never defined", 1, 6, 7)];
        let rendered = render_reports(Path::new("Bad.s"), source, &diags);
        assert!(rendered.contains("Symbol 'Missing' is used but never defined"));
    }

    #[test]
    fn test_render_reports_shows_lexer_hints() {
        let source = "code C\n  var s: ptr to char = \"a\\q\"\nendCode\n";
        let diags = SourceLanguage::Kpl.diagnose(source);
        let rendered = render_reports(Path::new("Bad.k"), source, &diags);
        assert!(rendered.contains("Invalid escape sequence"));
        assert!(rendered.contains("Valid escapes are"));
    }
}
