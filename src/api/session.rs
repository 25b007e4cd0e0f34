//! Session management for multi-turn API conversations

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::rag::ConversationMemory;

/// Chat session data
#[derive(Debug)]
pub struct ChatSession {
    pub session_id: String,
    pub memory: ConversationMemory,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl ChatSession {
    #[must_use]
    pub fn new(session_id: impl Into<String>, memory: ConversationMemory) -> Self {
        let now = Instant::now();
        Self {
            session_id: session_id.into(),
            memory,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    #[must_use]
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Session table keyed by client-supplied id
pub struct SessionManager {
    sessions: Arc<DashMap<String, SharedSession>>,
    session_timeout: Duration,
    max_history_turns: Option<usize>,
}

impl SessionManager {
    #[must_use]
    pub fn new(session_timeout_secs: u64, max_history_turns: Option<usize>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            session_timeout: Duration::from_secs(session_timeout_secs),
            max_history_turns,
        }
    }

    /// Sweep expired sessions once a minute
    pub fn start_cleanup_task(&self) -> JoinHandle<()> {
        let sessions = self.sessions.clone();
        let timeout = self.session_timeout;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Self::cleanup_expired_sessions(&sessions, timeout);
            }
        })
    }

    /// Fresh memory honoring the configured history cap
    #[must_use]
    pub fn new_memory(&self) -> ConversationMemory {
        self.max_history_turns
            .map_or_else(ConversationMemory::new, ConversationMemory::with_max_turns)
    }

    #[must_use]
    pub fn get_or_create(&self, session_id: &str) -> SharedSession {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Created session: {}", session_id);
                Arc::new(Mutex::new(ChatSession::new(session_id, self.new_memory())))
            })
            .clone()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn cleanup_expired(&self) {
        Self::cleanup_expired_sessions(&self.sessions, self.session_timeout);
    }

    fn cleanup_expired_sessions(
        sessions: &DashMap<String, SharedSession>,
        timeout: Duration,
    ) {
        let snapshot: Vec<(String, SharedSession)> = sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        for (session_id, session) in snapshot {
            // Decided under the shard lock, so `get_or_create` cannot hand the
            // session out in between. Any holder besides the table and this
            // snapshot, or a held lock, means a request is using it.
            let removed = sessions.remove_if(&session_id, |_, current| {
                Arc::ptr_eq(current, &session)
                    && Arc::strong_count(current) == 2
                    && current
                        .try_lock()
                        .is_ok_and(|guard| guard.is_expired(timeout))
            });
            if removed.is_some() {
                tracing::info!("Cleaned up expired session: {}", session_id);
            }
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(3600, None) // 1 hour timeout
    }
}
