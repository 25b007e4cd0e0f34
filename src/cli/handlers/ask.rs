//! One-shot question handler

use std::time::Instant;

use crate::cli::output::truncate_str;
use crate::config::AppConfig;
use crate::rag::ConversationMemory;
use crate::rag::ConversationalRetrievalChain;
use crate::Result;

pub async fn handle_ask_command(config: &AppConfig, question: &str, show_sources: bool) -> Result<()> {
    let chain = ConversationalRetrievalChain::from_config(config).await?;
    let mut memory = ConversationMemory::new();

    let start = Instant::now();
    let response = chain.call(&mut memory, question).await?;

    println!("Answer: {}", response.answer);
    println!("Time taken: {:.2} secs", start.elapsed().as_secs_f64());

    if show_sources {
        println!();
        println!("📚 Sources ({}):", response.source_documents.len());
        for (idx, doc) in response.source_documents.iter().enumerate() {
            let location = match (doc.source(), doc.page()) {
                (Some(source), Some(page)) => format!("{source} (page {page})"),
                (Some(source), None) => source.to_string(),
                _ => "unknown".to_string(),
            };
            println!("  {}. {}", idx + 1, location);
            println!("     {}", truncate_str(&doc.page_content.replace('\n', " "), 160));
        }
    }

    Ok(())
}
