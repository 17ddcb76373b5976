//! End-to-end HTTP test: compile the built-in catalog, serve the router in-process on an
//! ephemeral port, then submit and browse through the JSON API.

use serde_json::json;
use std::sync::Arc;
use training_portal::{compile, transport, FormRegistry, SqliteStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_and_browse_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(SqliteStore::open(&dir.path().join("portal.db"), 4).await?);
    let registry = Arc::new(FormRegistry::builtin()?);
    compile(&registry, store.as_ref()).await?;

    let router = transport::http::create_router(transport::http::AppState::new(registry, store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();

    // --- health ---
    let health = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["forms"], 9);

    // --- navigation + layout ---
    let forms = client
        .get(format!("{}/api/forms", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(forms["data"][0]["slug"], "EBT-Modules-Forms");

    let layout = client
        .get(format!("{}/api/forms/EBT-Modules-Forms", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let inputs = layout["data"]["inputs"].as_array().expect("inputs");
    assert_eq!(inputs.len(), 5);
    assert_eq!(inputs[3]["id"], "Competency");
    assert_eq!(inputs[3]["widget"], "dropdown");

    let missing = client
        .get(format!("{}/api/forms/Nope", base_url))
        .send()
        .await?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    // --- placeholder before any selection ---
    let placeholder = client
        .get(format!("{}/api/browse", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(placeholder["data"]["kind"], "placeholder");
    assert_eq!(placeholder["data"]["severity"], "info");

    // --- validation failure ---
    let invalid = client
        .post(format!("{}/api/forms/EBT-Modules-Forms/submit", base_url))
        .json(&json!({
            "trainer_name": "J. Smith",
            "training_date": "2024-03-01",
            "fields": {"ModuleNumber": 3, "Competency": "", "PerformanceScore": 4}
        }))
        .send()
        .await?;
    assert_eq!(invalid.status(), reqwest::StatusCode::OK);
    let invalid = invalid.json::<serde_json::Value>().await?;
    assert_eq!(invalid["success"], false);
    assert_eq!(invalid["data"]["severity"], "warning");
    assert_eq!(invalid["data"]["open_alert"], true);

    // --- successful submission ---
    let created = client
        .post(format!("{}/api/forms/EBT-Modules-Forms/submit", base_url))
        .json(&json!({
            "trainer_name": "J. Smith",
            "training_date": "2024-03-01",
            "fields": {"ModuleNumber": 3, "Competency": "Leadership", "PerformanceScore": 4}
        }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(created["success"], true, "{}", created);
    assert_eq!(created["data"]["message"], "Form submitted successfully!");

    // --- browse ---
    let browsed = client
        .get(format!("{}/api/browse?table=EbtModules", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let grid = &browsed["data"];
    assert_eq!(grid["kind"], "grid");
    assert_eq!(
        grid["columns"],
        json!([
            "ID",
            "SubmissionDate",
            "TrainerName",
            "TrainingDate",
            "ModuleNumber",
            "Competency",
            "PerformanceScore"
        ])
    );
    let rows = grid["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Competency"], "Leadership");
    assert_eq!(rows[0]["ModuleNumber"].as_f64(), Some(3.0));

    let failed = client
        .get(format!("{}/api/browse?table=NoSuchTable", base_url))
        .send()
        .await?;
    assert_eq!(failed.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let failed = failed.json::<serde_json::Value>().await?;
    assert_eq!(failed["data"]["kind"], "error");
    assert_eq!(failed["data"]["severity"], "danger");

    // --- options + schema ---
    let options = client
        .get(format!("{}/api/browse/options", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(options["data"][0], json!({"label": "EBT Modules Forms", "value": "EbtModules"}));

    let schema = client
        .get(format!("{}/bootstrap/schema", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(schema["data"]["tables"].as_array().map(|t| t.len()), Some(9));

    server_handle.abort();
    Ok(())
}
