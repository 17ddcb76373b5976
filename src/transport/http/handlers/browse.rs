use crate::app::BrowseResult;
use crate::domain::form::layout;
use crate::transport::http::types::{ApiResponse, AppState, BrowseQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/browse/options",
    responses(
        (status = 200, description = "Table selector options (label = form name, value = table name)", body = ApiResponse)
    )
)]
pub async fn browse_options_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::ok(layout::browse_options(&state.registry))),
    )
}

#[utoipa::path(
    get,
    path = "/api/browse",
    params(BrowseQuery),
    responses(
        (status = 200, description = "Grid of all rows (newest first), or the selection placeholder", body = ApiResponse),
        (status = 500, description = "Table could not be loaded", body = ApiResponse)
    )
)]
pub async fn browse_handler(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    let result = state.browser.browse(query.table.as_deref()).await;
    let (status, success, error) = match &result {
        BrowseResult::Error { message, .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, false, Some(message.clone()))
        }
        _ => (StatusCode::OK, true, None),
    };
    (
        status,
        Json(ApiResponse {
            success,
            data: serde_json::to_value(&result).ok(),
            error,
        }),
    )
}
