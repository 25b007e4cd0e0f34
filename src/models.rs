use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Metadata key holding the path a document was loaded from
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding the 0-based page index of a PDF page
pub const PAGE_KEY: &str = "page";

/// A unit of text with provenance metadata
///
/// Loaders produce one `Document` per file (or per PDF page); the splitter
/// turns each of those into several chunk `Document`s sharing the parent's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    pub fn page(&self) -> Option<u32> {
        self.metadata.get(PAGE_KEY).and_then(|p| p.parse().ok())
    }
}

/// A document returned from the vector store together with its cosine similarity
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub similarity: f32,
    pub embedding: Vec<f32>,
}

/// A chunk row as stored in the vector store
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub id: String,
    pub collection: String,
    pub content: String,
    pub metadata: HashMap<String, String>,
    pub embedding: Vec<f32>,
}

/// Registered collection
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Collection {
    pub name: String,
    pub dimension: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
