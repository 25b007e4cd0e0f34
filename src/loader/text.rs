//! Plain text files

use std::path::Path;

use crate::errors::DocBotError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::SOURCE_KEY;

/// Read a UTF-8 text file into a single document
pub fn load(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| DocBotError::document_parse(path, e))?;
    let content = super::strip_nul(content);

    Ok(Document::new(content).with_metadata(SOURCE_KEY, path.display().to_string()))
}
