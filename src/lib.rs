pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod errors;
pub mod ingest;
pub mod llm;
pub mod loader;
pub mod logging;
pub mod models;
pub mod rag;
pub mod splitter;
pub mod vectorstore;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
