//! Shared fakes for the chain, API and CLI tests
#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use docbot::llm::ChatMessage;
use docbot::llm::ChatModel;
use docbot::models::Document;
use docbot::rag::ConversationalRetrievalChain;
use docbot::rag::DocumentRetriever;
use docbot::DocBotError;
use docbot::Result;

/// Echoes the last user message and records every prompt it sees
#[derive(Default)]
pub struct EchoModel {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl ChatModel for EchoModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(messages.to_vec());
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("reply {n}: {last}"))
    }
}

/// Always fails, like an unreachable endpoint
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String> {
        Err(DocBotError::LlmError("connection refused".to_string()))
    }
}

/// Returns the same documents for every query
pub struct FixedRetriever(pub Vec<Document>);

#[async_trait]
impl DocumentRetriever for FixedRetriever {
    async fn retrieve(&self, _query: &str) -> Result<Vec<Document>> {
        Ok(self.0.clone())
    }
}

pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new("Refunds are issued within 14 days.").with_metadata("source", "policy.txt"),
        Document::new("Support is open on weekdays.").with_metadata("source", "hours.txt"),
    ]
}

pub fn echo_chain() -> (Arc<EchoModel>, Arc<ConversationalRetrievalChain>) {
    let model = Arc::new(EchoModel::default());
    let chain = ConversationalRetrievalChain::new(
        model.clone(),
        Arc::new(FixedRetriever(sample_documents())),
    );
    (model, Arc::new(chain))
}

pub fn failing_chain() -> Arc<ConversationalRetrievalChain> {
    Arc::new(ConversationalRetrievalChain::new(
        Arc::new(FailingModel),
        Arc::new(FixedRetriever(sample_documents())),
    ))
}
