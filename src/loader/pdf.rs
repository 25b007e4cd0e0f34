//! PDF files, split per page

use std::path::Path;

use tracing::debug;

use crate::errors::DocBotError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::PAGE_KEY;
use crate::models::SOURCE_KEY;

/// Extract one document per page; `page` metadata is the 0-based page index
pub fn load(path: &Path) -> Result<Vec<Document>> {
    let pdf = lopdf::Document::load(path).map_err(|e| DocBotError::document_parse(path, e))?;
    let source = path.display().to_string();

    let pages = pdf.get_pages();
    debug!("Extracting {} pages from {}", pages.len(), source);

    let mut documents = Vec::with_capacity(pages.len());
    for (index, page_number) in pages.keys().enumerate() {
        let text = pdf
            .extract_text(&[*page_number])
            .map_err(|e| DocBotError::document_parse(path, format!("page {page_number}: {e}")))?;

        documents.push(
            Document::new(super::strip_nul(text))
                .with_metadata(SOURCE_KEY, source.clone())
                .with_metadata(PAGE_KEY, index.to_string()),
        );
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_garbage_pdf_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, DocBotError::DocumentParse { .. }));
        assert!(err.to_string().contains("broken.pdf"));
    }
}
