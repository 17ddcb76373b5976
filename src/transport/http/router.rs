use crate::transport::http::handlers::{browse, forms, health, schema};
use crate::transport::http::types::{ApiResponse, AppState, SubmitRequest};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        forms::list_forms_handler,
        forms::form_layout_handler,
        forms::submit_handler,
        browse::browse_options_handler,
        browse::browse_handler,
        schema::bootstrap_get_schema_handler
    ),
    components(schemas(ApiResponse, SubmitRequest))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/forms", get(forms::list_forms_handler))
        .route("/api/forms/:slug", get(forms::form_layout_handler))
        .route("/api/forms/:slug/submit", post(forms::submit_handler))
        .route("/api/browse/options", get(browse::browse_options_handler))
        .route("/api/browse", get(browse::browse_handler))
        .route("/bootstrap/schema", get(schema::bootstrap_get_schema_handler))
        .with_state(app_state)
}
