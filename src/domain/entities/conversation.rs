use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Running question/answer history for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Pairs each user message with the assistant reply that follows it.
    /// An unanswered trailing question yields an exchange with no answer.
    pub fn exchanges(&self) -> Vec<Exchange> {
        let mut exchanges = Vec::new();
        let mut pending: Option<String> = None;

        for message in &self.messages {
            match message.role {
                MessageRole::User => {
                    if let Some(question) = pending.take() {
                        exchanges.push(Exchange {
                            question,
                            answer: None,
                        });
                    }
                    pending = Some(message.content.clone());
                }
                MessageRole::Assistant => {
                    exchanges.push(Exchange {
                        question: pending.take().unwrap_or_default(),
                        answer: Some(message.content.clone()),
                    });
                }
            }
        }

        if let Some(question) = pending {
            exchanges.push(Exchange {
                question,
                answer: None,
            });
        }

        exchanges
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_message_updates_history() {
        let mut conv = Conversation::new();
        conv.add_message(MessageRole::User, "What is this about?");
        conv.add_message(MessageRole::Assistant, "A test document.");

        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role, MessageRole::User);
        assert_eq!(conv.messages[1].content, "A test document.");
    }

    #[test]
    fn test_exchanges_pairs_question_and_answer() {
        let mut conv = Conversation::new();
        conv.add_message(MessageRole::User, "q1");
        conv.add_message(MessageRole::Assistant, "a1");
        conv.add_message(MessageRole::User, "q2");

        let exchanges = conv.exchanges();
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].question, "q1");
        assert_eq!(exchanges[0].answer.as_deref(), Some("a1"));
        assert_eq!(exchanges[1].question, "q2");
        assert!(exchanges[1].answer.is_none());
    }
}
