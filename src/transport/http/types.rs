use crate::app::{BrowseHandler, RawSubmission, SubmissionHandler};
use crate::domain::form::FormRegistry;
use crate::storage::table::SqliteStore;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<FormRegistry>,
    pub store: Arc<SqliteStore>,
    pub submissions: SubmissionHandler,
    pub browser: BrowseHandler,
}

impl AppState {
    pub fn new(registry: Arc<FormRegistry>, store: Arc<SqliteStore>) -> Self {
        let submissions = SubmissionHandler::new(registry.clone(), store.clone());
        let browser = BrowseHandler::new(store.clone());
        Self {
            registry,
            store,
            submissions,
            browser,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: impl Serialize) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or(JsonValue::Null)),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SubmitRequest {
    #[serde(default)]
    pub trainer_name: Option<String>,
    /// Training date as entered, e.g. `2024-03-01`.
    #[serde(default)]
    pub training_date: Option<String>,
    /// Field name -> value, e.g. `{ "ModuleNumber": 3, "Competency": "Leadership" }`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: HashMap<String, JsonValue>,
}

impl From<SubmitRequest> for RawSubmission {
    fn from(r: SubmitRequest) -> Self {
        RawSubmission {
            trainer_name: r.trainer_name,
            training_date: r.training_date,
            fields: r.fields,
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    /// Physical table name; omit to get the selection placeholder.
    #[serde(default)]
    pub table: Option<String>,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
