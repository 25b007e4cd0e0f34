//! Retrieval over the vector store

use async_trait::async_trait;
use tracing::debug;

pub use crate::config::SearchType;
use crate::config::RetrievalConfig;
use crate::errors::Result;
use crate::models::Document;
use crate::vectorstore::VectorStore;

/// Source of context documents for a question
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// Search parameters, MMR with `k = 3`, `fetch_k = 4`, `lambda = 0.5` by default
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub search_type: SearchType,
    pub k: usize,
    pub fetch_k: usize,
    pub lambda_mult: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

impl From<&RetrievalConfig> for SearchOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            search_type: config.search_type,
            k: config.k,
            fetch_k: config.fetch_k,
            lambda_mult: config.lambda_mult,
        }
    }
}

/// Retriever backed by a pgvector collection
pub struct Retriever {
    store: VectorStore,
    options: SearchOptions,
}

impl Retriever {
    pub fn new(store: VectorStore, options: SearchOptions) -> Self {
        Self { store, options }
    }
}

#[async_trait]
impl DocumentRetriever for Retriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        debug!("Retrieving with {:?}: {}", self.options.search_type, query);

        let scored = match self.options.search_type {
            SearchType::Similarity => self.store.similarity_search(query, self.options.k).await?,
            SearchType::Mmr => {
                self.store
                    .max_marginal_relevance_search(
                        query,
                        self.options.k,
                        self.options.fetch_k,
                        self.options.lambda_mult,
                    )
                    .await?
            }
        };

        debug!("Retrieved {} documents", scored.len());
        Ok(scored.into_iter().map(|s| s.document).collect())
    }
}
