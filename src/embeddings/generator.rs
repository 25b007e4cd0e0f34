//! Embedding generation service with batching and dimension checks

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::ensure_dimension;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::DocBotError;
use crate::errors::Result;

/// Service for embedding chunks and queries with the configured model
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config)?)
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Embed a single query text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let prepared = prepare_text(text)?;
        let embedding = self.client.generate(&prepared).await?;
        ensure_dimension(&embedding, self.config.dimension)?;
        Ok(embedding)
    }

    /// Embed many texts, preserving input order
    pub async fn generate_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prepared = texts
            .iter()
            .map(|text| prepare_text(text))
            .collect::<Result<Vec<String>>>()?;

        let mut embeddings = Vec::with_capacity(prepared.len());
        for (batch_idx, batch) in prepared.chunks(MAX_BATCH_SIZE).enumerate() {
            debug!("Embedding batch {} ({} texts)", batch_idx + 1, batch.len());
            let batch_embeddings = self
                .client
                .generate_batch(batch.iter().map(String::as_str).collect())
                .await?;
            embeddings.extend(batch_embeddings);
        }

        for embedding in &embeddings {
            ensure_dimension(embedding, self.config.dimension)?;
        }

        info!(
            "Generated {} embeddings with {} ({:?})",
            embeddings.len(),
            self.config.model,
            self.config.provider
        );

        Ok(embeddings)
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider
    #[must_use]
    pub const fn provider(&self) -> EmbeddingProvider {
        self.config.provider
    }
}

/// Collapse line breaks and runs of whitespace into single spaces
fn prepare_text(text: &str) -> Result<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(DocBotError::EmbeddingError(
            "Cannot embed empty text".to_string(),
        ));
    }
    Ok(normalized)
}
