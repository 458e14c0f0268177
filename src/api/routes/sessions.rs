use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::templates;
use crate::application::{ChatSession, ConversationEngine, UploadedFile};
use crate::domain::ports::VectorStore;
use crate::domain::{Document, Exchange};
use crate::infrastructure::InMemoryVectorStore;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub name: String,
    pub page_count: usize,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            page_count: doc.page_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub session_id: Uuid,
    pub documents: Vec<DocumentSummary>,
    pub chunk_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
    pub user_html: String,
    pub bot_html: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub exchanges: Vec<Exchange>,
    pub html: String,
}

pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.sessions.create().await;
    Json(SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
    })
}

/// Runs the full pipeline for one upload set: extract, chunk, embed, index,
/// then swap in a fresh conversation engine for the session.
pub async fn process_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let session = find_session(&state, id).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart request: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload {name}: {e}")))?;
        files.push(UploadedFile {
            name,
            data: data.to_vec(),
        });
    }

    let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
    let outcome = state
        .ingest_service
        .build_knowledge_base(&files, &store)
        .await?;

    let engine = Arc::new(ConversationEngine::new(
        state.embedding.clone(),
        store,
        state.llm.clone(),
        state.config.llm.system_prompt.clone(),
        state.config.retrieval.top_k,
    ));
    session.replace_engine(engine).await;

    tracing::info!(
        session_id = %id,
        documents = outcome.documents.len(),
        chunks = outcome.chunk_count,
        "knowledge base built"
    );

    Ok(Json(ProcessResponse {
        session_id: id,
        documents: outcome.documents.into_iter().map(Into::into).collect(),
        chunk_count: outcome.chunk_count,
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session = find_session(&state, id).await?;
    let engine = session.engine().await.ok_or_else(|| {
        ApiError::conflict("no documents have been processed for this session yet")
    })?;

    let answer = engine.ask(&request.question).await?;
    let question = request.question.trim().to_string();

    Ok(Json(ChatResponse {
        user_html: templates::render_user(&question),
        bot_html: templates::render_bot(&answer.text),
        question,
        answer: answer.text,
    }))
}

pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = find_session(&state, id).await?;

    let exchanges = match session.engine().await {
        Some(engine) => engine.history().await.exchanges(),
        None => Vec::new(),
    };

    Ok(Json(HistoryResponse {
        session_id: id,
        html: templates::render_history(&exchanges),
        exchanges,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("session not found"))
    }
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<ChatSession>, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found("session not found"))
}
