use axum::response::Html;

use crate::api::templates;

pub async fn index() -> Html<String> {
    Html(templates::chat_page())
}
