use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Logs one line per request. Session-scoped routes are tagged with the
/// session id so one session's upload/chat activity can be followed.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let session_id = session_id_from_path(uri.path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    match session_id {
        Some(session_id) => info!(
            method = %method,
            uri = %uri,
            session_id = %session_id,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        ),
        None => info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        ),
    }

    response
}

/// Extracts the session id from `/api/v1/sessions/{id}` and its subroutes.
fn session_id_from_path(path: &str) -> Option<Uuid> {
    let rest = path.strip_prefix("/api/v1/sessions/")?;
    let id = rest.split('/').next()?;
    Uuid::parse_str(id).ok()
}
