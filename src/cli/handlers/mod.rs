//! CLI command handlers module
//!
//! - chat: interactive question/answer loop
//! - ask: one-shot question
//! - ingest: document indexing
//! - serve: API server
//! - init: vector store initialization and reset
//! - info: configuration display

pub mod ask;
pub mod chat;
pub mod info;
pub mod ingest;
pub mod init;
pub mod serve;

pub use ask::*;
pub use chat::*;
pub use info::*;
pub use ingest::*;
pub use init::*;
pub use serve::*;
