use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Failed to parse document {path}: {message}")]
    DocumentParse { path: String, message: String },

    #[error("Vector store not found: collection '{0}' does not exist, run `docbot ingest` first")]
    VectorStoreNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DocBotError {
    pub fn document_parse(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::DocumentParse {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocBotError>;
