//! Recursive character text splitting
//!
//! Text is cut on the first separator from `["\n\n", "\n", " ", ""]` that
//! occurs in it. Pieces shorter than `chunk_size` are merged back into windows
//! that overlap by at most `chunk_overlap` characters; pieces that are still too
//! long are split again with the next separator. The separator stays attached to
//! the start of the piece that follows it. All lengths are counted in characters.

use std::collections::VecDeque;

use tracing::debug;
use tracing::warn;

use crate::errors::DocBotError;
use crate::errors::Result;
use crate::models::Document;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into overlapping fixed-size windows
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocBotError::InvalidInput(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap > chunk_size {
            return Err(DocBotError::InvalidInput(format!(
                "chunk overlap ({chunk_overlap}) is larger than chunk size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
        })
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Split every document; chunks inherit a copy of their parent's metadata
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let chunks: Vec<Document> = documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.page_content)
                    .into_iter()
                    .map(move |chunk| Document {
                        page_content: chunk,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect();

        debug!(
            "Split {} documents into {} chunks (size {}, overlap {})",
            documents.len(),
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map_or("", String::as_str);
        let mut remaining: &[String] = &[];

        for (idx, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[idx + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut short_pieces: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                short_pieces.push(piece);
                continue;
            }

            if !short_pieces.is_empty() {
                chunks.extend(self.merge_pieces(&short_pieces));
                short_pieces.clear();
            }

            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !short_pieces.is_empty() {
            chunks.extend(self.merge_pieces(&short_pieces));
        }

        chunks
    }

    /// Greedily join pieces into windows of at most `chunk_size` characters
    fn merge_pieces(&self, pieces: &[String]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.chunk_size
                    );
                }

                if !window.is_empty() {
                    if let Some(doc) = join_window(&window) {
                        docs.push(doc);
                    }

                    // Drop from the front until only the overlap is left and the next piece fits
                    while total > self.chunk_overlap
                        || (total > 0 && total + len > self.chunk_size)
                    {
                        let Some((_, first_len)) = window.pop_front() else {
                            break;
                        };
                        total -= first_len;
                    }
                }
            }

            window.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(doc) = join_window(&window) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Split with the default chunk size (1000) and overlap (200)
pub fn split_documents_default(documents: &[Document]) -> Vec<Document> {
    TextSplitter::default().split_documents(documents)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split on `separator`, prefixing each following piece with it; empty pieces are dropped
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();

    if let Some(first) = parts.next() {
        if !first.is_empty() {
            pieces.push(first.to_string());
        }
    }
    pieces.extend(parts.map(|part| format!("{separator}{part}")));

    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SOURCE_KEY;

    const SENTENCE: &str = "This is a sample document for testing the split_documents function.";

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(100, 101).is_err());
        assert!(TextSplitter::new(100, 100).is_ok());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = TextSplitter::default().split_text(SENTENCE);
        assert_eq!(chunks, vec![SENTENCE.to_string()]);
    }

    #[test]
    fn test_custom_size_without_overlap() {
        let splitter = TextSplitter::new(40, 0).unwrap();
        let chunks = splitter.split_text(SENTENCE);

        assert_eq!(
            chunks,
            vec![
                "This is a sample document for testing".to_string(),
                "the split_documents function.".to_string(),
            ]
        );
    }

    #[test]
    fn test_windows_overlap() {
        let splitter = TextSplitter::new(5, 2).unwrap();
        let chunks = splitter.split_text("a b c d e f g h i j");

        assert_eq!(
            chunks,
            vec!["a b c", "c d", "d e", "e f", "f g", "g h", "h i", "i j"]
        );
    }

    #[test]
    fn test_paragraph_separator_preferred() {
        let splitter = TextSplitter::new(12, 0).unwrap();
        let chunks = splitter.split_text("para one.\n\npara two.");

        assert_eq!(chunks, vec!["para one.", "para two."]);
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let splitter = TextSplitter::new(4, 0).unwrap();
        let chunks = splitter.split_text("abcdefghij");

        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n".repeat(50);
        let splitter = TextSplitter::new(100, 20).unwrap();

        for chunk in splitter.split_text(&text) {
            assert!(chunk.chars().count() <= 100, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let splitter = TextSplitter::new(3, 0).unwrap();
        let chunks = splitter.split_text("日本語テキスト");

        assert_eq!(chunks, vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert!(TextSplitter::default().split_text("  \n\n \n ").is_empty());
        assert!(TextSplitter::default().split_text("").is_empty());
    }

    #[test]
    fn test_split_documents_copies_metadata() {
        let docs = vec![
            Document::new(SENTENCE).with_metadata(SOURCE_KEY, "a.docx"),
            Document::new("Another short one.").with_metadata(SOURCE_KEY, "b.txt"),
        ];

        let splitter = TextSplitter::new(40, 0).unwrap();
        let chunks = splitter.split_documents(&docs);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].source(), Some("a.docx"));
        assert_eq!(chunks[1].source(), Some("a.docx"));
        assert_eq!(chunks[2].source(), Some("b.txt"));
    }

    #[test]
    fn test_split_documents_default() {
        let docs = vec![Document::new(SENTENCE)];
        assert_eq!(split_documents_default(&docs).len(), 1);
    }
}
