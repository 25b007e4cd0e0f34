//! Context assembly from retrieved documents

use crate::models::Document;

/// Joins retrieved page contents into the `{context}` slot of the QA prompt
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    separator: String,
}

impl ContextAssembler {
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    #[must_use]
    pub fn assemble(&self, documents: &[Document]) -> String {
        documents
            .iter()
            .map(|doc| doc.page_content.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_joins_with_blank_line() {
        let docs = vec![Document::new("first"), Document::new("second")];
        assert_eq!(ContextAssembler::default().assemble(&docs), "first\n\nsecond");
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(ContextAssembler::default().assemble(&[]), "");
    }
}
