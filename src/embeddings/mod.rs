//! Embeddings generation module
//!
//! Text embeddings come from an external HTTP provider:
//! - Ollama (local models, `all-minilm` by default)
//! - OpenAI (text-embedding-3-small, text-embedding-ada-002, etc.)
//!
//! # Examples
//!
//! ```rust,no_run
//! use docbot::embeddings::EmbeddingService;
//! use docbot::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;

use crate::errors::DocBotError;
use crate::errors::Result;

/// Default embedding dimension for all-MiniLM-L6-v2
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maximum number of inputs sent in one embedding request
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        let provider: EmbeddingProvider = config.embeddings.provider.parse()?;

        Ok(Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: config.embeddings.endpoint.trim_end_matches('/').to_string(),
            api_key: config
                .embeddings
                .api_key
                .clone()
                .filter(|key| !key.is_empty()),
        })
    }
}

/// Check that a provider returned vectors of the configured size
pub fn ensure_dimension(embedding: &[f32], expected: usize) -> Result<()> {
    if embedding.len() == expected {
        Ok(())
    } else {
        Err(DocBotError::EmbeddingError(format!(
            "expected {} dimensions, provider returned {}",
            expected,
            embedding.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_config_from_defaults() {
        let config = EmbeddingConfig::from_app_config(&AppConfig::default()).unwrap();

        assert_eq!(config.provider, EmbeddingProvider::Ollama);
        assert_eq!(config.model, "all-minilm");
        assert_eq!(config.dimension, DEFAULT_EMBEDDING_DIM);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_trims_endpoint_and_empty_key() {
        let mut app = AppConfig::default();
        app.embeddings.provider = "OpenAI".to_string();
        app.embeddings.endpoint = "https://api.openai.com/v1/".to_string();
        app.embeddings.api_key = Some(String::new());

        let config = EmbeddingConfig::from_app_config(&app).unwrap();
        assert_eq!(config.provider, EmbeddingProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let mut app = AppConfig::default();
        app.embeddings.provider = "word2vec".to_string();

        assert!(matches!(
            EmbeddingConfig::from_app_config(&app),
            Err(DocBotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_ensure_dimension() {
        assert!(ensure_dimension(&[0.0; 384], 384).is_ok());
        assert!(matches!(
            ensure_dimension(&[0.0; 3], 384),
            Err(DocBotError::EmbeddingError(_))
        ));
    }
}
