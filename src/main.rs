//! Wordgrid HTTP server.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wordgrid::{router, AppState, SessionManager, WordList};

/// Fallback word list for development when no file is configured.
const DEV_WORDS: &str = include_str!("../words/dev_words.txt");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3037);

    let lexicon = match std::env::var("WORDGRID_WORDS") {
        Ok(path) => WordList::from_file(Path::new(&path))?,
        Err(_) => {
            warn!("WORDGRID_WORDS not set, using built-in development word list");
            WordList::from_words(DEV_WORDS.lines())
        }
    };
    info!(words = lexicon.len(), "Lexicon ready");

    let state = AppState {
        sessions: SessionManager::new(),
        lexicon: Arc::new(lexicon),
    };

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!(port, "Server ready at http://localhost:{}/api", port);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
