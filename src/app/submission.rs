//! Submission handling: presence validation, then one insert into the form's table.

use crate::domain::form::{
    FieldKind, FormDefinition, FormRegistry, ConfigurationError, SUBMISSION_DATE_COLUMN,
    TRAINER_NAME_COLUMN, TRAINING_DATE_COLUMN,
};
use crate::storage::table::{RecordId, TableStore, Value};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill out all required fields.";
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// Format of the server-assigned submission timestamp.
pub const SUBMISSION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw user input for one form, as sent back by the UI layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub trainer_name: Option<String>,
    #[serde(default)]
    pub training_date: Option<String>,
    /// Field name -> user-entered value.
    #[serde(default)]
    pub fields: HashMap<String, JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// What the UI shows after a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub open_alert: bool,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success { record_id: RecordId },
    /// Names of the inputs that were absent or empty, in column order.
    ValidationFailure { missing: Vec<String> },
    StorageFailure { message: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    pub fn to_result(&self) -> SubmissionResult {
        match self {
            SubmissionOutcome::Success { .. } => SubmissionResult {
                open_alert: true,
                message: SUCCESS_MESSAGE.to_string(),
                severity: Severity::Success,
            },
            SubmissionOutcome::ValidationFailure { .. } => SubmissionResult {
                open_alert: true,
                message: REQUIRED_FIELDS_MESSAGE.to_string(),
                severity: Severity::Warning,
            },
            SubmissionOutcome::StorageFailure { message } => SubmissionResult {
                open_alert: true,
                message: format!("Database error: {}", message),
                severity: Severity::Danger,
            },
        }
    }
}

/// One handler serves every form; the form is an argument, not a captured variable.
#[derive(Clone)]
pub struct SubmissionHandler {
    registry: Arc<FormRegistry>,
    store: Arc<dyn TableStore>,
}

impl SubmissionHandler {
    pub fn new(registry: Arc<FormRegistry>, store: Arc<dyn TableStore>) -> Self {
        Self { registry, store }
    }

    pub async fn submit(
        &self,
        form_name: &str,
        submission: &RawSubmission,
    ) -> Result<SubmissionOutcome, ConfigurationError> {
        self.submit_at(form_name, submission, Local::now().naive_local())
            .await
    }

    /// Same as [`SubmissionHandler::submit`] with an explicit submission time.
    pub async fn submit_at(
        &self,
        form_name: &str,
        submission: &RawSubmission,
        submitted_at: NaiveDateTime,
    ) -> Result<SubmissionOutcome, ConfigurationError> {
        let form = self.registry.resolve(form_name)?;

        let missing = missing_inputs(form, submission);
        if !missing.is_empty() {
            tracing::warn!(form = form.name(), ?missing, "submission rejected, required fields missing");
            return Ok(SubmissionOutcome::ValidationFailure { missing });
        }

        let (columns, values) = assemble_row(form, submission, submitted_at);
        match self.store.insert(form.table_name(), &columns, &values).await {
            Ok(record_id) => {
                tracing::info!(table = form.table_name(), record_id, "submission stored");
                Ok(SubmissionOutcome::Success { record_id })
            }
            Err(e) => {
                tracing::error!(table = form.table_name(), error = %e, "submission insert failed");
                Ok(SubmissionOutcome::StorageFailure {
                    message: e.to_string(),
                })
            }
        }
    }
}

fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn missing_inputs(form: &FormDefinition, submission: &RawSubmission) -> Vec<String> {
    let mut missing = Vec::new();
    if submission.trainer_name.as_deref().map_or(true, str::is_empty) {
        missing.push(TRAINER_NAME_COLUMN.to_string());
    }
    if submission.training_date.as_deref().map_or(true, str::is_empty) {
        missing.push(TRAINING_DATE_COLUMN.to_string());
    }
    for field in form.fields() {
        if is_blank(submission.fields.get(&field.name)) {
            missing.push(field.name.clone());
        }
    }
    missing
}

/// Numbers bound to numeric fields go in as floating point; everything else as text and the
/// column decides whether it fits.
fn to_store_value(kind: &FieldKind, raw: &JsonValue) -> Value {
    match (kind, raw) {
        (FieldKind::Numeric, JsonValue::Number(n)) => n
            .as_f64()
            .map(Value::Real)
            .unwrap_or_else(|| Value::Text(n.to_string())),
        (_, JsonValue::String(s)) => Value::Text(s.clone()),
        (_, other) => Value::Text(other.to_string()),
    }
}

/// Submission timestamp, trainer, training date, then each field in form order.
fn assemble_row(
    form: &FormDefinition,
    submission: &RawSubmission,
    submitted_at: NaiveDateTime,
) -> (Vec<String>, Vec<Value>) {
    let mut columns = vec![
        SUBMISSION_DATE_COLUMN.to_string(),
        TRAINER_NAME_COLUMN.to_string(),
        TRAINING_DATE_COLUMN.to_string(),
    ];
    let mut values = vec![
        Value::Text(submitted_at.format(SUBMISSION_DATE_FORMAT).to_string()),
        Value::Text(submission.trainer_name.clone().unwrap_or_default()),
        Value::Text(submission.training_date.clone().unwrap_or_default()),
    ];
    for field in form.fields() {
        columns.push(field.name.clone());
        values.push(
            submission
                .fields
                .get(&field.name)
                .map(|raw| to_store_value(&field.kind, raw))
                .unwrap_or(Value::Null),
        );
    }
    (columns, values)
}
