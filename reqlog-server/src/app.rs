use axum::{
    Json, Router,
    extract::Path,
    routing::{get, post, put},
};
use reqlog_filter::{RequestLogPipeline, log_requests};
use serde_json::{Value, json};
use std::sync::Arc;

/// Demo routes with the request logger layered on top.
pub fn build_app(pipeline: Arc<RequestLogPipeline>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users", post(create_user))
        .route("/api/users/{id}", put(update_user).post(update_user))
        .layer(axum::middleware::from_fn_with_state(pipeline, log_requests))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_user(Json(user): Json<Value>) -> (axum::http::StatusCode, Json<Value>) {
    (axum::http::StatusCode::CREATED, Json(user))
}

async fn update_user(Path(id): Path<String>, Json(user): Json<Value>) -> Json<Value> {
    Json(json!({ "id": id, "user": user }))
}
