use anyhow::Context;
use docsearch::config::Config;
use docsearch::search::SearchIndex;
use docsearch::server::SearchServer;
use docsearch::state::SearchState;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging - write to stderr to avoid interfering with MCP protocol on stdout
    docsearch::tracing::init();

    let mut config = Config::load().context("Failed to load configuration")?;
    // A corpus path given on the command line wins over config and environment
    if let Some(arg) = std::env::args_os().nth(1) {
        config.corpus = Some(PathBuf::from(arg));
    }

    let corpus = config
        .corpus
        .clone()
        .context("No corpus configured. Pass a corpus path or set DOCSEARCH_CORPUS")?;

    tracing::info!("Starting docsearch MCP server (corpus: {})", corpus.display());

    // Index building is CPU bound; keep it off the async workers
    let cache_dir = config.cache_dir.clone();
    let index = tokio::task::spawn_blocking(move || {
        SearchIndex::load_or_build(&corpus, cache_dir.as_deref())
    })
    .await
    .context("Index build task panicked")?
    .context("Failed to load search index")?;

    let state = Arc::new(SearchState::new(Arc::new(index), &config));
    let server = SearchServer::new(state);

    // Create and serve the MCP server over stdio
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}
