use crate::app::RawSubmission;
use crate::domain::form::layout;
use crate::transport::http::handlers::common::form_for_slug;
use crate::transport::http::types::{json_422, ApiResponse, AppState, SubmitRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;

#[utoipa::path(
    get,
    path = "/api/forms",
    responses(
        (status = 200, description = "Forms in navigation order", body = ApiResponse)
    )
)]
pub async fn list_forms_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::ok(layout::navigation(&state.registry))),
    )
}

#[utoipa::path(
    get,
    path = "/api/forms/{slug}",
    params(
        ("slug" = String, Path, description = "Form slug (e.g. EBT-Modules-Forms)")
    ),
    responses(
        (status = 200, description = "Input layout for the form", body = ApiResponse),
        (status = 404, description = "Form not found", body = ApiResponse)
    )
)]
pub async fn form_layout_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let form = match form_for_slug(&state, &slug) {
        Ok(f) => f,
        Err(resp) => return resp.into_response(),
    };
    let today = Local::now().date_naive();
    (
        StatusCode::OK,
        Json(ApiResponse::ok(layout::form_layout(form, today))),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/forms/{slug}/submit",
    params(
        ("slug" = String, Path, description = "Form slug (e.g. EBT-Modules-Forms)")
    ),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission result to display (success, validation or storage failure)", body = ApiResponse),
        (status = 404, description = "Form not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn submit_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    request: Result<Json<SubmitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let form = match form_for_slug(&state, &slug) {
        Ok(f) => f,
        Err(resp) => return resp.into_response(),
    };

    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"trainer_name\": ..., \"training_date\": ..., \"fields\": {...}}",
            )
            .into_response();
        }
    };

    let submission: RawSubmission = request.into();
    match state.submissions.submit(form.name(), &submission).await {
        Ok(outcome) => {
            let result = outcome.to_result();
            (
                StatusCode::OK,
                Json(ApiResponse {
                    success: outcome.is_success(),
                    data: serde_json::to_value(&result).ok(),
                    error: None,
                }),
            )
                .into_response()
        }
        // The slug resolved, so the registry and routing disagree.
        Err(e) => {
            tracing::error!(error = %e, "submit routed to an unregistered form");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(e.to_string())),
            )
                .into_response()
        }
    }
}
