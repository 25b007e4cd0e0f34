//! RAG (Retrieval-Augmented Generation) module
//!
//! A conversational retrieval chain over the document vector store:
//! - Follow-up questions are condensed into standalone questions using the chat history
//! - Relevant chunks are retrieved with maximal marginal relevance
//! - The chat model answers strictly from the retrieved context
//!
//! # Examples
//!
//! ```rust,no_run
//! use docbot::config::AppConfig;
//! use docbot::rag::ConversationMemory;
//! use docbot::rag::ConversationalRetrievalChain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let chain = ConversationalRetrievalChain::from_config(&config).await?;
//!     let mut memory = ConversationMemory::new();
//!
//!     let response = chain.call(&mut memory, "What is this document about?").await?;
//!     println!("Answer: {}", response.answer);
//!     println!("Sources: {} chunks", response.source_documents.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod context;
pub mod memory;
pub mod prompts;
pub mod retriever;

pub use chain::ChainResponse;
pub use chain::Conversation;
pub use chain::ConversationalRetrievalChain;
pub use context::ContextAssembler;
pub use memory::ConversationMemory;
pub use memory::HistoryMessage;
pub use memory::MessageType;
pub use retriever::DocumentRetriever;
pub use retriever::Retriever;
pub use retriever::SearchOptions;
pub use retriever::SearchType;
