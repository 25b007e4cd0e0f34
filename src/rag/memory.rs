//! Rolling chat-history buffer

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    Ai,
}

/// One entry of a transcript, serialized as `{"type": "human"|"ai", "content": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
}

impl HistoryMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Ai,
            content: content.into(),
        }
    }
}

/// Question/answer pairs in the order they happened
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: VecDeque<(String, String)>,
    max_turns: Option<usize>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_turns` exchanges, dropping the oldest first
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns: Some(max_turns),
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        config
            .chat
            .max_history_turns
            .map_or_else(Self::new, Self::with_max_turns)
    }

    pub fn save_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push_back((question.into(), answer.into()));
        if let Some(max) = self.max_turns {
            while self.turns.len() > max {
                self.turns.pop_front();
            }
        }
    }

    pub fn messages(&self) -> Vec<HistoryMessage> {
        self.turns
            .iter()
            .flat_map(|(question, answer)| {
                [HistoryMessage::human(question), HistoryMessage::ai(answer)]
            })
            .collect()
    }

    /// History as `Human:` / `Assistant:` lines for the condense prompt
    pub fn render_buffer(&self) -> String {
        self.turns
            .iter()
            .map(|(question, answer)| format!("Human: {question}\nAssistant: {answer}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
