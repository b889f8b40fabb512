//! LSP (Language Server Protocol) backend for KPL and Blitz assembly

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use kpl_syntax::blitz::{BlitzParser, BlitzToken};
use kpl_syntax::diagnostics;
use kpl_syntax::lexer::Token;
use kpl_syntax::parser;

use crate::format::format_edits;
use crate::lsp::completion::{blitz_completions, kpl_completions};
use crate::lsp::diagnostics::{from_position, to_lsp_diagnostic, to_range};
use crate::lsp::hover::{HoverInfo, blitz_hover, kpl_hover};
use crate::workspace::{SourceLanguage, Workspace, WorkspaceConfig};

/// Per-language results kept for hover
#[derive(Debug)]
pub enum Analysis {
    Kpl { tokens: Vec<Token> },
    /// The parser holds the symbol table of this document.
    Blitz { tokens: Vec<BlitzToken>, parser: BlitzParser },
}

/// Document state stored by the LSP
#[derive(Debug)]
pub struct DocumentState {
    pub source: String,
    pub version: i32,
    pub language: SourceLanguage,
    pub analysis: Analysis,
}

/// Pick a language from the URI's extension, falling back to the client's language id.
pub fn language_for(uri: &Url, language_id: Option<&str>) -> Option<SourceLanguage> {
    SourceLanguage::from_path(Path::new(uri.path())).or(match language_id {
        Some("kpl") => Some(SourceLanguage::Kpl),
        Some("blitz") | Some("blitz-asm") => Some(SourceLanguage::Blitz),
        _ => None,
    })
}

/// Run the language's pipeline over one document.
pub fn analyze(source: &str, language: SourceLanguage) -> (Analysis, Vec<diagnostics::Diagnostic>) {
    match language {
        SourceLanguage::Kpl => {
            let outcome = parser::parse_source(source);
            (Analysis::Kpl { tokens: outcome.tokens }, outcome.diagnostics)
        }
        SourceLanguage::Blitz => {
            let mut parser = BlitzParser::new();
            let result = parser.parse_text(source);
            (
                Analysis::Blitz {
                    tokens: result.tokens,
                    parser,
                },
                result.diagnostics,
            )
        }
    }
}

/// Hover for a document at an LSP position.
pub fn hover_at(doc: &DocumentState, position: Position) -> Option<HoverInfo> {
    let (line, column) = from_position(position);
    match &doc.analysis {
        Analysis::Kpl { tokens } => kpl_hover(tokens, line, column),
        Analysis::Blitz { tokens, parser } => blitz_hover(tokens, parser.symbols(), line, column),
    }
}

/// Whole-line replacements that format a Blitz document.
pub fn formatting_edits(source: &str) -> Vec<TextEdit> {
    format_edits(source)
        .into_iter()
        .map(|edit| {
            let line = edit.line as u32;
            let end = edit.original.chars().count() as u32;
            TextEdit {
                range: Range::new(Position::new(line, 0), Position::new(line, end)),
                new_text: edit.replacement,
            }
        })
        .collect()
}

/// KPL / Blitz Language Server
pub struct KplLanguageServer {
    client: Client,
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
    workspace: Arc<RwLock<Option<Workspace>>>,
}

impl KplLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            workspace: Arc::new(RwLock::new(None)),
        }
    }

    /// Analyze a document, store it, and publish diagnostics
    async fn analyze_document(&self, uri: &Url, source: String, version: i32, language: SourceLanguage) {
        let (analysis, diags) = analyze(&source, language);
        tracing::debug!(uri = %uri, diagnostics = diags.len(), "analyzed document");
        let lsp_diags: Vec<Diagnostic> = diags.iter().map(to_lsp_diagnostic).collect();

        if let Ok(path) = uri.to_file_path() {
            if let Some(workspace) = self.workspace.write().await.as_mut() {
                workspace.update_file(path, source.clone());
            }
        }

        {
            let mut docs = self.documents.write().await;
            docs.insert(
                uri.clone(),
                DocumentState {
                    source,
                    version,
                    language,
                    analysis,
                },
            );
        }

        // Publish even if empty, to clear old ones
        self.client
            .publish_diagnostics(uri.clone(), lsp_diags, Some(version))
            .await;
    }

    async fn index_workspace(&self) {
        let mut guard = self.workspace.write().await;
        let Some(workspace) = guard.as_mut() else {
            return;
        };
        match workspace.refresh() {
            Ok(count) => {
                self.client
                    .log_message(MessageType::INFO, format!("Indexed {count} KPL/Blitz source file(s)"))
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "workspace indexing failed");
                self.client
                    .log_message(MessageType::WARNING, format!("Workspace indexing failed: {e}"))
                    .await;
            }
        }
    }
}

fn root_path(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok())
        .or_else(|| params.root_uri.as_ref().and_then(|uri| uri.to_file_path().ok()))
}

#[tower_lsp::async_trait]
impl LanguageServer for KplLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(root) = root_path(&params) {
            tracing::info!(root = %root.display(), "workspace root");
            *self.workspace.write().await = Some(Workspace::new(WorkspaceConfig::new(root)));
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "kpl-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "KPL language server initialized")
            .await;
        self.index_workspace().await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let Some(language) = language_for(&doc.uri, Some(&doc.language_id)) else {
            tracing::debug!(uri = %doc.uri, language = %doc.language_id, "ignoring document");
            return;
        };
        self.analyze_document(&doc.uri, doc.text, doc.version, language).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let known = self.documents.read().await.get(&uri).map(|d| d.language);
        let Some(language) = known.or_else(|| language_for(&uri, None)) else {
            return;
        };

        // FULL sync: the single change holds the whole document
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_document(&uri, change.text, version, language).await;
        }
    }

    async fn did_save(&self, _: DidSaveTextDocumentParams) {
        self.index_workspace().await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let mut docs = self.documents.write().await;
        docs.remove(&uri);

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(uri) else {
            return Ok(None);
        };

        Ok(hover_at(doc, position).map(|info| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: info.markdown,
            }),
            range: Some(to_range(info.line, info.column, info.length)),
        }))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;

        let docs = self.documents.read().await;
        let language = docs.get(uri).map(|d| d.language).or_else(|| language_for(uri, None));

        let items = match language {
            Some(SourceLanguage::Kpl) => kpl_completions(),
            Some(SourceLanguage::Blitz) => blitz_completions(),
            None => return Ok(None),
        };
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let docs = self.documents.read().await;
        let Some(doc) = docs.get(&params.text_document.uri) else {
            return Ok(None);
        };
        if doc.language != SourceLanguage::Blitz {
            return Ok(None);
        }
        tracing::debug!(version = doc.version, "formatting document");
        Ok(Some(formatting_edits(&doc.source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("file:///project/{path}")).unwrap()
    }

    #[test]
    fn test_language_for_extension_and_id() {
        assert_eq!(language_for(&url("Main.k"), None), Some(SourceLanguage::Kpl));
        assert_eq!(language_for(&url("Boot.s"), Some("kpl")), Some(SourceLanguage::Blitz));
        assert_eq!(language_for(&url("scratch"), Some("blitz-asm")), Some(SourceLanguage::Blitz));
        assert_eq!(language_for(&url("notes.md"), Some("markdown")), None);
    }

    #[test]
    fn test_analyze_kpl_reports_parse_errors() {
        let (analysis, diags) = analyze("code Main\n", SourceLanguage::Kpl);
        assert!(matches!(analysis, Analysis::Kpl { .. }));
        assert!(diags.iter().any(|d| d.is_error()));

        let (_, diags) = analyze("code Main\nendCode\n", SourceLanguage::Kpl);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_analyze_blitz_keeps_symbols_for_hover() {
        let source = "Start:\n\tcall Start\n".to_string();
        let (analysis, diags) = analyze(&source, SourceLanguage::Blitz);
        assert!(diags.is_empty());
        let doc = DocumentState {
            source,
            version: 1,
            language: SourceLanguage::Blitz,
            analysis,
        };
        let info = hover_at(&doc, Position::new(1, 7)).unwrap();
        assert!(info.markdown.contains("**Label**"));
        assert_eq!((info.line, info.column), (2, 7));
    }

    #[test]
    fn test_formatting_edits_replace_whole_lines() {
        let edits = formatting_edits("\tnop\nL: ret\n");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range, Range::new(Position::new(1, 0), Position::new(1, 6)));
        assert_eq!(edits[0].new_text, "L:\n\tret");
    }
}
