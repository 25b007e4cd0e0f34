//! Document ingestion handler

use std::path::PathBuf;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::ingest::ingest_directory;
use crate::splitter::TextSplitter;
use crate::Result;

pub async fn handle_ingest_command(
    config: &AppConfig,
    path: Option<PathBuf>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(&config.documents.path));
    let splitter = TextSplitter::new(
        chunk_size.unwrap_or(config.documents.chunk_size),
        chunk_overlap.unwrap_or(config.documents.chunk_overlap),
    )?;

    print_info(&format!(
        "Ingesting {} into collection '{}' (chunk size {}, overlap {})",
        path.display(),
        config.collection(),
        splitter.chunk_size(),
        splitter.chunk_overlap()
    ));

    let report = ingest_directory(config, &path, &splitter).await?;

    if report.documents == 0 {
        print_warning(&format!(
            "No .pdf, .docx or .txt files found under {}",
            report.path.display()
        ));
    }

    print_success(&format!(
        "{} documents → {} chunks → {} new vectors ({} ms)",
        report.documents, report.chunks, report.inserted, report.elapsed_ms
    ));

    Ok(())
}
