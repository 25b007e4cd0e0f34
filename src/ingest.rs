//! Offline indexing path: load -> split -> embed -> store

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::DocBotError;
use crate::errors::Result;
use crate::loader;
use crate::splitter::TextSplitter;
use crate::vectorstore::VectorStore;

/// What an ingest run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub path: PathBuf,
    pub documents: usize,
    pub chunks: usize,
    pub inserted: u64,
    pub elapsed_ms: u128,
}

/// Load every supported file under `path` and add its chunks to the configured collection
pub async fn ingest_directory(
    config: &AppConfig,
    path: &Path,
    splitter: &TextSplitter,
) -> Result<IngestReport> {
    let start = Instant::now();

    let root = path.to_path_buf();
    let documents = tokio::task::spawn_blocking(move || loader::load_documents(root))
        .await
        .map_err(|e| DocBotError::Io(std::io::Error::other(e)))??;

    if documents.is_empty() {
        warn!("No supported documents found under {}", path.display());
    }

    let chunks = splitter.split_documents(&documents);
    info!(
        "Loaded {} documents, {} chunks from {}",
        documents.len(),
        chunks.len(),
        path.display()
    );

    let store = VectorStore::open_or_create(config).await?;
    info!(
        "Embedding with {:?} model {} into collection '{}'",
        store.embeddings().provider(),
        store.embeddings().model(),
        store.collection()
    );
    let inserted = store.add_documents(&chunks).await?;

    Ok(IngestReport {
        path: path.to_path_buf(),
        documents: documents.len(),
        chunks: chunks.len(),
        inserted,
        elapsed_ms: start.elapsed().as_millis(),
    })
}
