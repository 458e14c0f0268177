use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, LlmService, VectorStore},
    Conversation, DomainError, MessageRole, SearchResult,
};

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub history: Conversation,
}

/// Retrieval-augmented chat over one session's knowledge base.
///
/// Each question is embedded, the most relevant chunks are retrieved, and the
/// language model answers from retrieved context plus the running
/// conversation memory. The memory lock is held across the model call so
/// concurrent questions on the same session serialize into turns.
pub struct ConversationEngine {
    embedding: Arc<dyn EmbeddingService>,
    knowledge_base: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmService>,
    system_prompt: String,
    top_k: usize,
    memory: Mutex<Conversation>,
}

impl ConversationEngine {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        knowledge_base: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmService>,
        system_prompt: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            embedding,
            knowledge_base,
            llm,
            system_prompt: system_prompt.into(),
            top_k,
            memory: Mutex::new(Conversation::new()),
        }
    }

    #[instrument(skip(self, question))]
    pub async fn ask(&self, question: &str) -> Result<Answer, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        let query = self.embedding.embed(question).await?;
        let results = self.knowledge_base.search(&query, self.top_k).await?;

        let mut memory = self.memory.lock().await;
        let prompt = self.build_prompt(question, &results, &memory);
        let answer = self
            .llm
            .complete_with_system(&self.system_prompt, &prompt)
            .await?;

        memory.add_message(MessageRole::User, question);
        memory.add_message(MessageRole::Assistant, &answer);

        Ok(Answer {
            text: answer,
            history: memory.clone(),
        })
    }

    pub async fn history(&self) -> Conversation {
        self.memory.lock().await.clone()
    }

    fn build_prompt(
        &self,
        question: &str,
        results: &[SearchResult],
        history: &Conversation,
    ) -> String {
        let mut prompt = String::new();

        if !results.is_empty() {
            let context = results
                .iter()
                .enumerate()
                .map(|(i, r)| format!("[{}] {}", i + 1, r.chunk.content))
                .collect::<Vec<_>>()
                .join("\n\n");
            prompt.push_str(&format!("Context from the uploaded documents:\n{context}\n\n"));
        }

        if !history.is_empty() {
            let past = history
                .messages
                .iter()
                .map(|m| format!("{}: {}", m.role.as_str(), m.content))
                .collect::<Vec<_>>()
                .join("\n");
            prompt.push_str(&format!("Previous conversation:\n{past}\n\n"));
        }

        prompt.push_str(&format!("Current question from user: {question}"));
        prompt
    }
}
