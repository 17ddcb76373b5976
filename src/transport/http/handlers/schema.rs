use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/bootstrap/schema",
    responses(
        (status = 200, description = "Current physical schema", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn bootstrap_get_schema_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.describe_tables().await {
        Ok(tables) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "tables": tables }))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Failed to list tables: {}", e))),
        )
            .into_response(),
    }
}
