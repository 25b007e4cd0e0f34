//! Vector store adapter over PostgreSQL + pgvector
//!
//! A named collection is the unit of persistence. Chunks are embedded with the
//! configured embedding service and written once; ids are content hashes so
//! re-ingesting the same files is a no-op.

use std::sync::Arc;

use sha2::Digest;
use sha2::Sha256;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::DocBotError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::ScoredDocument;
use crate::models::StoredChunk;
use crate::models::PAGE_KEY;
use crate::models::SOURCE_KEY;

/// Handle to one collection in the vector store
#[derive(Clone)]
pub struct VectorStore {
    database: Arc<Database>,
    embeddings: Arc<EmbeddingService>,
    collection: String,
}

impl VectorStore {
    pub fn new(
        database: Arc<Database>,
        embeddings: Arc<EmbeddingService>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            database,
            embeddings,
            collection: collection.into(),
        }
    }

    /// Open the configured collection, `None` if it has not been created yet
    pub async fn open(config: &AppConfig) -> Result<Option<Self>> {
        let database = Arc::new(Database::from_config(config).await?);
        let embeddings = Arc::new(EmbeddingService::new(config)?);
        Self::open_with(database, embeddings, config.collection()).await
    }

    /// Open a collection with existing handles
    pub async fn open_with(
        database: Arc<Database>,
        embeddings: Arc<EmbeddingService>,
        collection: &str,
    ) -> Result<Option<Self>> {
        let Some(existing) = database.get_collection(collection).await? else {
            debug!("Collection '{}' not found", collection);
            return Ok(None);
        };

        check_dimension(existing.dimension, embeddings.dimension(), collection)?;
        Ok(Some(Self::new(database, embeddings, collection)))
    }

    /// Open the configured collection or fail with `VectorStoreNotFound`
    pub async fn open_existing(config: &AppConfig) -> Result<Self> {
        Self::open(config)
            .await?
            .ok_or_else(|| DocBotError::VectorStoreNotFound(config.collection().to_string()))
    }

    /// Initialize the schema and register the configured collection
    pub async fn create(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embeddings = Arc::new(EmbeddingService::new(config)?);

        database
            .init_schema(
                embeddings.dimension(),
                config.vector_indexes_enabled(),
                config.vector_index_lists(),
            )
            .await?;

        let collection = database
            .create_collection(config.collection(), embeddings.dimension())
            .await?;
        check_dimension(collection.dimension, embeddings.dimension(), &collection.name)?;

        info!(
            "Vector store collection '{}' ready (dimension {})",
            collection.name, collection.dimension
        );

        Ok(Self::new(database, embeddings, collection.name))
    }

    pub async fn open_or_create(config: &AppConfig) -> Result<Self> {
        match Self::open(config).await? {
            Some(store) => Ok(store),
            None => Self::create(config).await,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn embeddings(&self) -> &EmbeddingService {
        &self.embeddings
    }

    /// Embed and store chunks; returns how many were new
    pub async fn add_documents(&self, documents: &[Document]) -> Result<u64> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.page_content.as_str()).collect();
        let embeddings = self.embeddings.generate_batch(texts).await?;

        let chunks: Vec<StoredChunk> = documents
            .iter()
            .zip(embeddings)
            .map(|(doc, embedding)| StoredChunk {
                id: chunk_id(&self.collection, doc),
                collection: self.collection.clone(),
                content: doc.page_content.clone(),
                metadata: doc.metadata.clone(),
                embedding,
            })
            .collect();

        let inserted = self.database.insert_chunks(&chunks).await?;
        info!(
            "Added {} new chunks to '{}' ({} submitted)",
            inserted,
            self.collection,
            documents.len()
        );

        Ok(inserted)
    }

    /// The `k` chunks closest to the query
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embeddings.generate(query).await?;
        self.database
            .search_chunks(&self.collection, &embedding, k as i64)
            .await
    }

    /// Fetch `fetch_k` candidates, then pick `k` of them with maximal marginal relevance
    pub async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda_mult: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embeddings.generate(query).await?;
        let candidates = self
            .database
            .search_chunks(&self.collection, &embedding, fetch_k.max(k) as i64)
            .await?;

        let candidate_embeddings: Vec<&[f32]> =
            candidates.iter().map(|c| c.embedding.as_slice()).collect();
        let picked = maximal_marginal_relevance(&embedding, &candidate_embeddings, k, lambda_mult);

        debug!(
            "MMR picked {:?} of {} candidates (lambda {})",
            picked,
            candidates.len(),
            lambda_mult
        );

        let mut slots: Vec<Option<ScoredDocument>> = candidates.into_iter().map(Some).collect();
        Ok(picked
            .into_iter()
            .filter_map(|idx| slots.get_mut(idx).and_then(Option::take))
            .collect())
    }

    pub async fn count(&self) -> Result<i64> {
        self.database.count_chunks(&self.collection).await
    }

    pub async fn delete_collection(&self) -> Result<()> {
        let removed = self.database.delete_collection(&self.collection).await?;
        info!("Deleted collection '{}' ({} rows)", self.collection, removed);
        Ok(())
    }
}

fn check_dimension(stored: i32, configured: usize, collection: &str) -> Result<()> {
    if stored as usize == configured {
        Ok(())
    } else {
        Err(DocBotError::ConfigError(format!(
            "Collection '{collection}' stores {stored}-dimensional embeddings \
             but the embedding model is configured for {configured}"
        )))
    }
}

/// Stable id for a chunk within a collection
pub fn chunk_id(collection: &str, document: &Document) -> String {
    let mut hasher = Sha256::new();
    for part in [
        collection,
        document.metadata.get(SOURCE_KEY).map_or("", String::as_str),
        document.metadata.get(PAGE_KEY).map_or("", String::as_str),
        document.page_content.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Indices of up to `k` candidates chosen by maximal marginal relevance
///
/// The first pick is the candidate closest to the query. Each later pick maximizes
/// `lambda * sim(query, d) - (1 - lambda) * max(sim(d, selected))`.
pub fn maximal_marginal_relevance(
    query: &[f32],
    candidates: &[&[f32]],
    k: usize,
    lambda_mult: f32,
) -> Vec<usize> {
    let k = k.min(candidates.len());
    if k == 0 {
        return Vec::new();
    }

    let query_sims: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();

    let mut selected: Vec<usize> = Vec::with_capacity(k);
    while selected.len() < k {
        let mut best: Option<(usize, f32)> = None;

        for (idx, candidate) in candidates.iter().enumerate() {
            if selected.contains(&idx) {
                continue;
            }

            let redundancy = selected
                .iter()
                .map(|&s| cosine_similarity(candidate, candidates[s]))
                .fold(f32::NEG_INFINITY, f32::max);
            let score = if selected.is_empty() {
                query_sims[idx]
            } else {
                lambda_mult * query_sims[idx] - (1.0 - lambda_mult) * redundancy
            };

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, _)) => selected.push(idx),
            None => break,
        }
    }

    selected
}
