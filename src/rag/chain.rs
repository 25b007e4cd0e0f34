//! Conversational retrieval chain: condense -> retrieve -> answer -> remember

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::context::ContextAssembler;
use super::memory::ConversationMemory;
use super::memory::HistoryMessage;
use super::prompts::condense_question_prompt;
use super::prompts::qa_system_prompt;
use super::retriever::DocumentRetriever;
use super::retriever::Retriever;
use super::retriever::SearchOptions;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::llm::ChatMessage;
use crate::llm::ChatModel;
use crate::llm::LlmService;
use crate::llm::PromptTemplate;
use crate::models::Document;
use crate::vectorstore::VectorStore;

/// Result of one chain call
#[derive(Debug, Clone, Serialize)]
pub struct ChainResponse {
    pub question: String,
    /// The standalone question actually used for retrieval
    pub generated_question: String,
    pub answer: String,
    /// Full transcript, including this turn
    pub chat_history: Vec<HistoryMessage>,
    pub source_documents: Vec<Document>,
}

pub struct ConversationalRetrievalChain {
    llm: Arc<dyn ChatModel>,
    retriever: Arc<dyn DocumentRetriever>,
    context_assembler: ContextAssembler,
    qa_prompt: PromptTemplate,
    condense_prompt: PromptTemplate,
}

impl ConversationalRetrievalChain {
    pub fn new(llm: Arc<dyn ChatModel>, retriever: Arc<dyn DocumentRetriever>) -> Self {
        Self {
            llm,
            retriever,
            context_assembler: ContextAssembler::default(),
            qa_prompt: qa_system_prompt(),
            condense_prompt: condense_question_prompt(),
        }
    }

    /// Open the configured collection and chat model
    ///
    /// # Errors
    /// - `VectorStoreNotFound` if nothing has been ingested into the collection
    /// - Database, embedding or LLM configuration errors
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = VectorStore::open_existing(config).await?;
        let retriever = Retriever::new(store, SearchOptions::from(&config.retrieval));
        let llm = LlmService::new(config)?;

        info!(
            "Conversation chain ready: collection '{}', model '{}'",
            config.collection(),
            llm.model()
        );

        Ok(Self::new(Arc::new(llm), Arc::new(retriever)))
    }

    /// Answer `question` in the context of `memory`, then record the turn
    pub async fn call(
        &self,
        memory: &mut ConversationMemory,
        question: &str,
    ) -> Result<ChainResponse> {
        let generated_question = if memory.is_empty() {
            question.to_string()
        } else {
            self.condense_question(memory, question).await?
        };
        debug!("Standalone question: {}", generated_question);

        let source_documents = self.retriever.retrieve(&generated_question).await?;
        let context = self.context_assembler.assemble(&source_documents);

        let system = self
            .qa_prompt
            .render(&HashMap::from([("context", context.as_str())]))?;
        let messages = [
            ChatMessage::system(system),
            ChatMessage::user(generated_question.as_str()),
        ];
        let answer = self.llm.chat(&messages).await?;

        memory.save_turn(question, answer.as_str());

        Ok(ChainResponse {
            question: question.to_string(),
            generated_question,
            answer,
            chat_history: memory.messages(),
            source_documents,
        })
    }

    async fn condense_question(
        &self,
        memory: &ConversationMemory,
        question: &str,
    ) -> Result<String> {
        let history = memory.render_buffer();
        let prompt = self.condense_prompt.render(&HashMap::from([
            ("chat_history", history.as_str()),
            ("question", question),
        ]))?;

        let standalone = self.llm.chat(&[ChatMessage::user(prompt)]).await?;
        Ok(standalone.trim().to_string())
    }
}

/// A chain bound to its own memory
pub struct Conversation {
    chain: Arc<ConversationalRetrievalChain>,
    memory: ConversationMemory,
}

impl Conversation {
    pub fn new(chain: Arc<ConversationalRetrievalChain>, memory: ConversationMemory) -> Self {
        Self { chain, memory }
    }

    pub async fn ask(&mut self, question: &str) -> Result<ChainResponse> {
        self.chain.call(&mut self.memory, question).await
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}
