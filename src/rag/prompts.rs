//! Prompts used by the conversational retrieval chain

use crate::llm::PromptTemplate;

/// System message wrapped around the retrieved context
pub const QA_SYSTEM_TEMPLATE: &str = r#"Strictly Use ONLY the following pieces of context to answer the question at the end. Think step-by-step and then answer.

Do not try to make up an answer:
- If the answer to the question cannot be determined from the context alone, say "I cannot determine the answer to that."
- If the context is empty, just say "I do not know the answer to that."

-------------------

{context}"#;

/// Rewrites a follow-up into a question that stands on its own
pub const CONDENSE_QUESTION_TEMPLATE: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{chat_history}
Follow Up Input: {question}
Standalone question:";

pub fn qa_system_prompt() -> PromptTemplate {
    PromptTemplate::new(QA_SYSTEM_TEMPLATE)
}

pub fn condense_question_prompt() -> PromptTemplate {
    PromptTemplate::new(CONDENSE_QUESTION_TEMPLATE)
}
