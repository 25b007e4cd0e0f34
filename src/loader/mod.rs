//! Document loading
//!
//! Walks a directory tree and dispatches every file to a format-specific
//! extractor chosen by extension:
//! - `.pdf`: one document per page
//! - `.docx`: one document with the body text
//! - `.txt`: one document with the file contents
//!
//! Anything else is skipped without error.

pub mod docx;
pub mod pdf;
pub mod text;

use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::errors::Result;
use crate::models::Document;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    /// Map a file extension (case-insensitive, without the dot) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Load every supported document below `path`
///
/// A missing path or a path that is not a directory yields an empty list.
/// Files that fail to parse are logged and skipped.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let root = path.as_ref();
    let mut documents = Vec::new();

    if !root.is_dir() {
        debug!("Document path {} is not a directory, nothing to load", root.display());
        return Ok(documents);
    }

    let mut files = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match load_file(entry.path()) {
            Ok(Some(docs)) => {
                files += 1;
                documents.extend(docs);
            }
            Ok(None) => debug!("Skipping unsupported file {}", entry.path().display()),
            Err(e) => warn!("{}", e),
        }
    }

    info!(
        "Loaded {} documents from {} files under {}",
        documents.len(),
        files,
        root.display()
    );

    Ok(documents)
}

/// Remove NUL characters, which PostgreSQL text columns reject
pub(crate) fn strip_nul(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    }
}

/// Load a single file, returning `None` for unsupported extensions
pub fn load_file(path: &Path) -> Result<Option<Vec<Document>>> {
    let Some(file_type) = FileType::from_path(path) else {
        return Ok(None);
    };

    let docs = match file_type {
        FileType::Pdf => pdf::load(path)?,
        FileType::Docx => vec![docx::load(path)?],
        FileType::Txt => vec![text::load(path)?],
    };

    Ok(Some(docs))
}
