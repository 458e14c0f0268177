use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ConversationEngine;

/// Per-user session state. Owns at most one conversation engine; processing
/// a new document set replaces the engine and with it the conversation
/// memory and knowledge base.
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    engine: RwLock<Option<Arc<ConversationEngine>>>,
    last_used: std::sync::RwLock<Instant>,
}

impl ChatSession {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            engine: RwLock::new(None),
            last_used: std::sync::RwLock::new(Instant::now()),
        }
    }

    pub async fn engine(&self) -> Option<Arc<ConversationEngine>> {
        self.engine.read().await.clone()
    }

    pub async fn replace_engine(&self, engine: Arc<ConversationEngine>) {
        *self.engine.write().await = Some(engine);
    }

    fn touch(&self) {
        if let Ok(mut last_used) = self.last_used.write() {
            *last_used = Instant::now();
        }
    }

    fn idle_for(&self) -> Duration {
        self.last_used
            .read()
            .map(|last_used| last_used.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

/// Registry of live sessions. A session that has been idle longer than the
/// TTL is destroyed; expired entries are swept on every `create` and `get`,
/// so no background task is needed. The lock only guards registry access;
/// each session serializes its own turns internally.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<ChatSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self) -> Arc<ChatSession> {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);

        let session = Arc::new(ChatSession::new());
        sessions.insert(session.id, session.clone());
        session
    }

    /// Looks up a live session, refreshing its idle clock.
    pub async fn get(&self, id: Uuid) -> Option<Arc<ChatSession>> {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);

        let session = sessions.get(&id).cloned();
        if let Some(session) = &session {
            session.touch();
        }
        session
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn sweep(sessions: &mut HashMap<Uuid, Arc<ChatSession>>, ttl: Duration) {
        sessions.retain(|_, session| session.idle_for() <= ttl);
    }
}
