use crate::domain::form::FormDefinition;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::StatusCode;
use axum::Json;

/// Resolves a URL slug to its form, or the 404 response the UI shows for unknown forms.
pub fn form_for_slug<'a>(
    state: &'a AppState,
    slug: &str,
) -> Result<&'a FormDefinition, (StatusCode, Json<ApiResponse>)> {
    state.registry.by_slug(slug.trim()).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!("Form '{}' not found", slug))),
        )
    })
}
