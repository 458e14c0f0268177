pub mod health;
pub mod sessions;
pub mod ui;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(axum::middleware::from_fn(
            crate::api::middleware::request_logger,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}/process", post(sessions::process_documents))
        .route("/sessions/{id}/chat", post(sessions::chat))
        .route("/sessions/{id}/history", get(sessions::history))
        .route(
            "/sessions/{id}",
            axum::routing::delete(sessions::delete_session),
        )
}
