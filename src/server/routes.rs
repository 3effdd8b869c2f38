use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::server::server::AppState;
use crate::sources::category::Category;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/numbers/{id}", get(numbers))
}

/// Service description and usage hint
async fn index() -> Json<serde_json::Value> {
    let valid_ids: Vec<String> = Category::ALL.iter().map(|c| c.usage_hint()).collect();
    Json(json!({
        "message": "Average Calculator HTTP Microservice",
        "usage": "GET /numbers/:numberid",
        "validNumberIds": valid_ids,
    }))
}

async fn numbers(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /numbers/{}", id);
    match state.handler.handle(&id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => e.into_response(),
    }
}
