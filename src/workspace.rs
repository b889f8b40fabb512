//! Source file discovery and content cache.
//!
//! A [`Workspace`] is constructed explicitly and passed to whoever needs it (CLI commands, the language server).
//! The cache is keyed by path and rebuilt wholesale by [`Workspace::refresh`]; there is no partial invalidation.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kpl_syntax::blitz::BlitzParser;
use kpl_syntax::diagnostics::Diagnostic;
use kpl_syntax::parser;
use thiserror::Error;

/// Language of a source file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// `.k` code files and `.h` header files
    Kpl,
    /// `.s` Blitz assembly
    Blitz,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "k" | "h" => Some(SourceLanguage::Kpl),
            "s" => Some(SourceLanguage::Blitz),
            _ => None,
        }
    }

    /// Every diagnostic for one document, in source order.
    pub fn diagnose(self, source: &str) -> Vec<Diagnostic> {
        match self {
            SourceLanguage::Kpl => parser::parse_source(source).diagnostics,
            SourceLanguage::Blitz => BlitzParser::new().parse_text(source).diagnostics,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace root '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Which files belong to the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
    /// Extensions without the dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub ignored_dirs: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl WorkspaceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: ["k", "h", "s"].map(String::from).to_vec(),
            ignored_dirs: [".git", "node_modules", "target"].map(String::from).to_vec(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignored_dir(mut self, name: impl Into<String>) -> Self {
        self.ignored_dirs.push(name.into());
        self
    }

    fn wants_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }

    fn skips_dir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.ignored_dirs.iter().any(|d| d == name))
    }
}

/// Discovered source files and their cached contents
#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    files: HashMap<PathBuf, String>,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            files: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Source files under the root, sorted by path.
    ///
    /// A root that is itself a matching file yields just that file.
    pub fn discover(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        let root = &self.config.root;
        if root.is_file() {
            return Ok(if self.config.wants_file(root) {
                vec![root.clone()]
            } else {
                Vec::new()
            });
        }
        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory(root.clone()));
        }

        let mut files = Vec::new();
        let mut stack = vec![root.clone()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    if !self.config.skips_dir(&path) {
                        stack.push(path);
                    }
                } else if self.config.wants_file(&path) {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Re-discover and re-read every file, replacing the whole cache. Returns the number of cached files.
    ///
    /// Unreadable files are logged and left out.
    #[tracing::instrument(skip_all, fields(root = %self.config.root.display()))]
    pub fn refresh(&mut self) -> Result<usize, WorkspaceError> {
        let mut files = HashMap::new();
        for path in self.discover()? {
            match read_file(&path) {
                Ok(content) => {
                    files.insert(path, content);
                }
                Err(e) => tracing::warn!(error = %e, "skipping unreadable file"),
            }
        }
        self.files = files;
        tracing::debug!(files = self.files.len(), "workspace refreshed");
        Ok(self.files.len())
    }

    pub fn file_content(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Replace one cached file, e.g. with an editor's unsaved contents.
    pub fn update_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn remove_file(&mut self, path: &Path) -> Option<String> {
        self.files.remove(path)
    }

    /// Cached paths, sorted.
    pub fn files(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.files.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }
}

/// Read one file, attaching the path to the error.
pub fn read_file(path: &Path) -> Result<String, WorkspaceError> {
    fs::read_to_string(path).map_err(|source| WorkspaceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kpl_ws_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_language_from_extension() {
        assert_eq!(SourceLanguage::from_path(Path::new("a/Main.k")), Some(SourceLanguage::Kpl));
        assert_eq!(SourceLanguage::from_path(Path::new("Main.h")), Some(SourceLanguage::Kpl));
        assert_eq!(SourceLanguage::from_path(Path::new("Runtime.s")), Some(SourceLanguage::Blitz));
        assert_eq!(SourceLanguage::from_path(Path::new("notes.txt")), None);
        assert_eq!(SourceLanguage::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_diagnose_dispatches_by_language() {
        assert!(SourceLanguage::Kpl.diagnose("code Main\nendCode\n").is_empty());
        assert!(!SourceLanguage::Kpl.diagnose("code Main\n").is_empty());

        let blitz = SourceLanguage::Blitz.diagnose("\tjmp Nowhere\n");
        assert_eq!(blitz.len(), 1);
        assert_eq!(blitz[0].message, "Symbol 'Nowhere' is used but never defined");
    }

    #[test]
    fn test_discover_skips_ignored_dirs_and_other_files() {
        let dir = scratch_dir("discover");
        fs::write(dir.join("Main.k"), "code Main\nendCode\n").unwrap();
        fs::write(dir.join("Main.h"), "header Main\nendHeader\n").unwrap();
        fs::write(dir.join("README.md"), "# hi").unwrap();
        fs::create_dir_all(dir.join("lib")).unwrap();
        fs::write(dir.join("lib/Runtime.s"), "\tret\n").unwrap();
        fs::create_dir_all(dir.join("node_modules")).unwrap();
        fs::write(dir.join("node_modules/Skip.k"), "").unwrap();

        let ws = Workspace::new(WorkspaceConfig::new(&dir));
        let names: Vec<String> = ws
            .discover()
            .unwrap()
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["Main.h", "Main.k", "lib/Runtime.s"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_refresh_replaces_cache() {
        let dir = scratch_dir("refresh");
        let file = dir.join("A.s");
        fs::write(&file, "\tnop\n").unwrap();

        let mut ws = Workspace::new(WorkspaceConfig::new(&dir));
        assert_eq!(ws.refresh().unwrap(), 1);
        assert_eq!(ws.file_content(&file), Some("\tnop\n"));

        ws.update_file(dir.join("Unsaved.k"), "code X\nendCode");
        assert_eq!(ws.files().len(), 2);

        fs::remove_file(&file).unwrap();
        assert_eq!(ws.refresh().unwrap(), 0);
        assert!(ws.file_content(&file).is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_root() {
        let ws = Workspace::new(WorkspaceConfig::new("/definitely/not/here"));
        let err = ws.discover().unwrap_err();
        assert!(matches!(err, WorkspaceError::NotADirectory(_)));
        assert_eq!(err.to_string(), "workspace root '/definitely/not/here' is not a directory");
    }

    #[test]
    fn test_single_file_root() {
        let dir = scratch_dir("single");
        let file = dir.join("One.k");
        fs::write(&file, "code One\nendCode\n").unwrap();
        let ws = Workspace::new(WorkspaceConfig::new(&file));
        assert_eq!(ws.discover().unwrap(), vec![file]);
        let _ = fs::remove_dir_all(&dir);
    }
}
