use axum::{response::IntoResponse, Json};

// axum handler for health
pub async fn health() -> impl IntoResponse {
    Json(sonic_rs::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
