//! CLI module for the KPL toolchain
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream of a KPL or Blitz file
//! - `parse <file>` - Print the AST of a KPL file (token list for Blitz)
//! - `check [path]` - Report diagnostics for every source file under a path
//! - `fmt [path]` - Format Blitz assembly files
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// A user-facing message plus the exit code to leave with.
#[derive(Debug)]
pub struct CliError {
    /// Already formatted for display
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Tooling for the KPL language and Blitz assembly
#[derive(Parser, Debug)]
#[command(name = "kpl")]
#[command(version = VERSION)]
#[command(about = "Lexer, parser, checker and formatter for KPL and Blitz assembly", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// How `check` prints its findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rendered reports with source context
    #[default]
    Text,
    /// One JSON object per diagnostic, one per line
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a source file
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the syntax tree of a source file
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Report diagnostics for source files
    Check {
        /// File or directory to check
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Format Blitz assembly files
    Fmt {
        /// File or directory to format
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
        /// Show diff of formatting changes
        #[arg(long)]
        diff: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file } => commands::parse_file(&file),
        Command::Check { path, format } => commands::check_path(&path, format),
        Command::Fmt { path, check, diff } => commands::format_files(&path, check, diff),
    }
}

// ============================================================================
// Tests
// ============================================================================
