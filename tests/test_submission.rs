//! Submission and browse flow over the built-in catalog.

use chrono::NaiveDateTime;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use training_portal::app::submission::SUBMISSION_DATE_FORMAT;
use training_portal::{
    compile, BrowseHandler, ConfigurationError, FormRegistry, RawSubmission, Severity,
    SqliteStore, SubmissionHandler, SubmissionOutcome, TableStore,
};

struct Harness {
    _dir: tempfile::TempDir,
    store: Arc<SqliteStore>,
    submissions: SubmissionHandler,
    browser: BrowseHandler,
}

async fn harness(compiled: bool) -> Result<Harness, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(SqliteStore::open(&dir.path().join("portal.db"), 2).await?);
    let registry = Arc::new(FormRegistry::builtin()?);
    if compiled {
        compile(&registry, store.as_ref()).await?;
    }
    Ok(Harness {
        _dir: dir,
        submissions: SubmissionHandler::new(registry, store.clone()),
        browser: BrowseHandler::new(store.clone()),
        store,
    })
}

fn ebt_submission() -> RawSubmission {
    RawSubmission {
        trainer_name: Some("J. Smith".into()),
        training_date: Some("2024-03-01".into()),
        fields: HashMap::from([
            ("ModuleNumber".to_string(), json!(3)),
            ("Competency".to_string(), json!("Leadership")),
            ("PerformanceScore".to_string(), json!(4)),
        ]),
    }
}

#[tokio::test]
async fn ebt_module_submission_is_browsable() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;

    let outcome = h.submissions.submit("EBT Modules Forms", &ebt_submission()).await?;
    let SubmissionOutcome::Success { record_id } = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    let result = outcome.to_result();
    assert!(result.open_alert);
    assert_eq!(result.severity, Severity::Success);

    let browsed = h.browser.browse(Some("EbtModules")).await;
    let grid = browsed.grid().expect("grid");
    assert_eq!(
        grid.columns,
        [
            "ID",
            "SubmissionDate",
            "TrainerName",
            "TrainingDate",
            "ModuleNumber",
            "Competency",
            "PerformanceScore"
        ]
    );
    assert_eq!(grid.rows.len(), 1);

    let row = &grid.rows[0];
    assert_eq!(row["ID"], json!(record_id));
    assert_eq!(row["TrainerName"], "J. Smith");
    assert_eq!(row["TrainingDate"], "2024-03-01");
    assert_eq!(row["ModuleNumber"].as_f64(), Some(3.0));
    assert_eq!(row["Competency"], "Leadership");
    assert_eq!(row["PerformanceScore"].as_f64(), Some(4.0));

    let stamp = row["SubmissionDate"].as_str().expect("timestamp text");
    NaiveDateTime::parse_from_str(stamp, SUBMISSION_DATE_FORMAT)?;
    Ok(())
}

#[tokio::test]
async fn submission_time_is_server_assigned() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;
    let at = NaiveDateTime::parse_from_str("2024-03-01 08:15:00", SUBMISSION_DATE_FORMAT)?;

    let outcome = h
        .submissions
        .submit_at("EBT Modules Forms", &ebt_submission(), at)
        .await?;
    assert!(outcome.is_success());

    let set = h.store.list_all("EbtModules").await?;
    assert_eq!(
        set.cell(0, "SubmissionDate").and_then(|v| v.as_text()),
        Some("2024-03-01 08:15:00")
    );
    Ok(())
}

#[tokio::test]
async fn missing_choice_is_validation_failure() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;
    h.submissions.submit("EBT Modules Forms", &ebt_submission()).await?;
    let before = h.store.count_rows("EbtModules").await?;

    let mut s = ebt_submission();
    s.fields.insert("Competency".into(), json!(""));
    let outcome = h.submissions.submit("EBT Modules Forms", &s).await?;
    assert_eq!(
        outcome,
        SubmissionOutcome::ValidationFailure {
            missing: vec!["Competency".into()]
        }
    );
    let result = outcome.to_result();
    assert_eq!(result.message, "Please fill out all required fields.");
    assert_eq!(result.severity, Severity::Warning);

    let mut s = ebt_submission();
    s.fields.remove("ModuleNumber");
    s.trainer_name = None;
    let outcome = h.submissions.submit("EBT Modules Forms", &s).await?;
    assert!(matches!(outcome, SubmissionOutcome::ValidationFailure { .. }));

    assert_eq!(h.store.count_rows("EbtModules").await?, before);
    Ok(())
}

#[tokio::test]
async fn unknown_form_is_configuration_error() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;
    let err = h
        .submissions
        .submit("Nonexistent Forms", &ebt_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownForm(ref n) if n == "Nonexistent Forms"));
    Ok(())
}

#[tokio::test]
async fn storage_errors_become_displayable_results() -> Result<(), Box<dyn std::error::Error>> {
    // Tables never created.
    let h = harness(false).await?;
    let outcome = h.submissions.submit("EBT Modules Forms", &ebt_submission()).await?;
    let SubmissionOutcome::StorageFailure { message } = &outcome else {
        panic!("expected storage failure, got {:?}", outcome);
    };
    assert!(message.contains("EbtModules"), "{}", message);
    let result = outcome.to_result();
    assert_eq!(result.severity, Severity::Danger);
    assert!(result.message.starts_with("Database error: "));

    // Value the numeric column cannot hold.
    let h = harness(true).await?;
    let mut s = ebt_submission();
    s.fields.insert("PerformanceScore".into(), json!("excellent"));
    let outcome = h.submissions.submit("EBT Modules Forms", &s).await?;
    assert!(matches!(outcome, SubmissionOutcome::StorageFailure { .. }), "{:?}", outcome);
    assert_eq!(h.store.count_rows("EbtModules").await?, 0);
    Ok(())
}

#[tokio::test]
async fn numeric_text_and_other_kinds_are_stored() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;
    let s = RawSubmission {
        trainer_name: Some("A. Lee".into()),
        training_date: Some("2024-04-02".into()),
        fields: HashMap::from([
            ("CourseTitle".to_string(), json!("Hydraulics")),
            ("AssessmentScore".to_string(), json!("87.5")),
            ("InstructorFeedback".to_string(), json!("Solid systems knowledge.")),
        ]),
    };
    let outcome = h.submissions.submit("Technical Ground Training Forms", &s).await?;
    assert!(outcome.is_success(), "{:?}", outcome);

    let set = h.store.list_all("GroundTraining").await?;
    assert_eq!(set.cell(0, "AssessmentScore").and_then(|v| v.as_f64()), Some(87.5));
    assert_eq!(
        set.cell(0, "InstructorFeedback").and_then(|v| v.as_text()),
        Some("Solid systems knowledge.")
    );
    Ok(())
}

#[tokio::test]
async fn newest_submission_is_listed_first() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(true).await?;
    for trainer in ["First", "Second", "Third"] {
        let mut s = ebt_submission();
        s.trainer_name = Some(trainer.into());
        h.submissions.submit("EBT Modules Forms", &s).await?;
    }

    let browsed = h.browser.browse(Some("EbtModules")).await;
    let grid = browsed.grid().expect("grid");
    let trainers: Vec<&str> = grid
        .rows
        .iter()
        .filter_map(|r| r["TrainerName"].as_str())
        .collect();
    assert_eq!(trainers, ["Third", "Second", "First"]);
    Ok(())
}
