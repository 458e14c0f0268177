use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use pdf_chat::api::{create_router, AppState};
use pdf_chat::domain::ports::{EmbeddingService, LlmService, TextExtractor};
use pdf_chat::domain::{Document, DomainError, Embedding, ExtractedDocument};
use pdf_chat::infrastructure::AppConfig;

struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, name: &str, data: &[u8]) -> Result<ExtractedDocument, DomainError> {
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| DomainError::extraction(e.to_string()))?;
        let doc = Document::new(name).with_page_count(1);
        Ok(ExtractedDocument::new(doc, vec![text]))
    }
}

struct KeywordEmbedding;

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let v = if text.contains("alpha") {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        };
        Ok(Embedding::new(v))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        2
    }
}

struct CannedLlm;

#[async_trait]
impl LlmService for CannedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
        Ok("canned <answer>".to_string())
    }

    async fn complete_with_system(
        &self,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, DomainError> {
        Ok("canned <answer>".to_string())
    }
}

fn test_router() -> Router {
    let state = AppState::with_ports(
        AppConfig::default(),
        Arc::new(PlainTextExtractor),
        Arc::new(KeywordEmbedding),
        Arc::new(CannedLlm),
    )
    .unwrap();
    create_router(state)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["session_id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn multipart_upload(uri: &str, files: &[(&str, &str)]) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = String::new();
    for (name, content) in files {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"documents\"; \
             filename=\"{name}\"\r\nContent-Type: application/pdf\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn chat_request(uri: &str, question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "question": question }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_process_then_chat_round_trip() {
    let app = test_router();
    let session_id = create_session(&app).await;

    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/v1/sessions/{session_id}/process"),
            &[
                ("a.pdf", "alpha facts live here"),
                ("b.pdf", "beta facts live here"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
    assert_eq!(body["documents"][0]["name"], "a.pdf");
    assert!(body["chunk_count"].as_u64().unwrap() >= 1);

    let response = app
        .clone()
        .oneshot(chat_request(
            &format!("/api/v1/sessions/{session_id}/chat"),
            "tell me about alpha",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["answer"], "canned <answer>");

    let user_html = body["user_html"].as_str().unwrap();
    let bot_html = body["bot_html"].as_str().unwrap();
    assert!(user_html.contains("tell me about alpha"));
    assert!(!user_html.contains("{{MSG}}"));
    // The answer's angle brackets must be escaped in the rendered bubble.
    assert!(bot_html.contains("canned &lt;answer&gt;"));
    assert!(!bot_html.contains("canned <answer>"));
}

#[tokio::test]
async fn test_history_accumulates_exchanges() {
    let app = test_router();
    let session_id = create_session(&app).await;

    app.clone()
        .oneshot(multipart_upload(
            &format!("/api/v1/sessions/{session_id}/process"),
            &[("doc.pdf", "alpha content")],
        ))
        .await
        .unwrap();

    for question in ["first question", "second question"] {
        let response = app
            .clone()
            .oneshot(chat_request(
                &format!("/api/v1/sessions/{session_id}/chat"),
                question,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/history"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["exchanges"].as_array().unwrap().len(), 2);
    assert_eq!(body["exchanges"][0]["question"], "first question");
    assert!(body["html"].as_str().unwrap().contains("chat-message user"));
}

#[tokio::test]
async fn test_reprocessing_replaces_conversation() {
    let app = test_router();
    let session_id = create_session(&app).await;
    let process_uri = format!("/api/v1/sessions/{session_id}/process");

    app.clone()
        .oneshot(multipart_upload(&process_uri, &[("one.pdf", "alpha text")]))
        .await
        .unwrap();
    app.clone()
        .oneshot(chat_request(
            &format!("/api/v1/sessions/{session_id}/chat"),
            "remembered question",
        ))
        .await
        .unwrap();

    // Re-processing swaps in a fresh engine with empty memory.
    app.clone()
        .oneshot(multipart_upload(&process_uri, &[("two.pdf", "beta text")]))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/history"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["exchanges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_before_processing_is_conflict() {
    let app = test_router();
    let session_id = create_session(&app).await;

    let response = app
        .clone()
        .oneshot(chat_request(
            &format!("/api/v1/sessions/{session_id}/chat"),
            "anything",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = test_router();
    let response = app
        .clone()
        .oneshot(chat_request(
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000/chat",
            "anything",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_router();
    let session_id = create_session(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_serves_chat_page() {
    let app = test_router();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Chat with multiple PDFs"));
}

#[tokio::test]
async fn test_health_reports_version() {
    let app = test_router();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}
