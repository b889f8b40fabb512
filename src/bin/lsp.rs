//! KPL / Blitz language server binary entry point
//!
//! Run with: kpl-lsp
//!
//! The server speaks the Language Server Protocol over stdin/stdout; logs go to stderr.

use kpl::lsp::KplLanguageServer;
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(KplLanguageServer::new);

    Server::new(stdin, stdout, socket).serve(service).await;
}
