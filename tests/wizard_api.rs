//! Integration tests for the wizard REST API.
//!
//! Each test spins up an Axum server on a random port and drives the real
//! REST contract with an HTTP client, with a recording submission sink
//! standing in for the external collaborator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::timeout;

use staff_onboard::error::SubmitError;
use staff_onboard::sessions::SessionRegistry;
use staff_onboard::submit::SubmissionSink;
use staff_onboard::wizard::model::Record;
use staff_onboard::wizard::routes::{WizardRouteState, wizard_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Records every submitted Record instead of calling anything external.
struct RecordingSink {
    submitted: Arc<Mutex<Vec<Record>>>,
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(&self, record: &Record) -> Result<(), SubmitError> {
        self.submitted.lock().await.push(record.clone());
        Ok(())
    }
}

/// Start an Axum server on a random port, return (base_url, submitted log).
async fn start_server() -> (String, Arc<Mutex<Vec<Record>>>) {
    let submitted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::new(RecordingSink {
        submitted: Arc::clone(&submitted),
    });
    let app = wizard_routes(WizardRouteState {
        sessions: SessionRegistry::new(),
        sink,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), submitted)
}

/// Create a session and return its id.
async fn create_session(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api/wizard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

/// Set a single field and return the response snapshot.
async fn set_field(client: &reqwest::Client, base: &str, id: &str, field: &str, value: Value) -> Value {
    let resp = client
        .post(format!("{base}/api/wizard/{id}/field"))
        .json(&json!({"field": field, "value": value}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "field update for {field} failed");
    resp.json().await.unwrap()
}

/// POST a navigation request and return the response body.
async fn navigate(client: &reqwest::Client, base: &str, id: &str, dir: &str) -> Value {
    let resp = client
        .post(format!("{base}/api/wizard/{id}/{dir}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Fill the four required profile fields.
async fn fill_profile(client: &reqwest::Client, base: &str, id: &str) {
    set_field(client, base, id, "full_name", json!("Alice Mwangi")).await;
    set_field(client, base, id, "email", json!("alice@agency.gov")).await;
    set_field(client, base, id, "department", json!("Water")).await;
    set_field(client, base, id, "designation", json!("Engineer")).await;
}

#[tokio::test]
async fn create_session_returns_initial_snapshot() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/api/wizard"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["step"], "role_selection");
        assert_eq!(body["step_index"], 1);
        assert_eq!(body["step_label"], "Role");
        assert_eq!(body["advance_allowed"], false);
        // No role yet, so the setup step is hidden.
        assert_eq!(
            body["visible_steps"],
            json!(["role_selection", "profile_info", "confirmation"])
        );
        assert!(body.get("summary").is_none());
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn department_head_full_flow_submits_record() {
    timeout(TEST_TIMEOUT, async {
        let (base, submitted) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        let snap = set_field(&client, &base, &id, "role", json!("department_head")).await;
        assert_eq!(snap["advance_allowed"], true);
        assert_eq!(
            snap["visible_steps"],
            json!([
                "role_selection",
                "profile_info",
                "department_setup",
                "confirmation"
            ])
        );

        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["moved"], true);
        assert_eq!(nav["step"], "profile_info");

        fill_profile(&client, &base, &id).await;
        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["step"], "department_setup");

        set_field(&client, &base, &id, "setup_resources_requested", json!(true)).await;
        set_field(
            &client,
            &base,
            &id,
            "selected_resources",
            json!(["infrastructure", "digital_assets"]),
        )
        .await;

        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["step"], "confirmation");
        let summary = nav["summary"].as_str().unwrap();
        assert!(summary.contains("Alice Mwangi"));
        assert!(summary.contains("Infrastructure"));
        assert!(summary.contains("Digital Assets"));

        let resp = client
            .post(format!("{base}/api/wizard/{id}/submit"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 202);

        let records = submitted.lock().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Alice Mwangi");
        assert_eq!(records[0].selected_resources.len(), 2);
        drop(records);

        // The session is discarded on submission.
        let resp = client
            .get(format!("{base}/api/wizard/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn personnel_skips_setup_step() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        set_field(&client, &base, &id, "role", json!("personnel")).await;
        navigate(&client, &base, &id, "advance").await;
        fill_profile(&client, &base, &id).await;

        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["moved"], true);
        assert_eq!(nav["step"], "confirmation");
        assert_eq!(
            nav["visible_steps"],
            json!(["role_selection", "profile_info", "confirmation"])
        );

        // Retreat from confirmation mirrors the skip.
        let nav = navigate(&client, &base, &id, "retreat").await;
        assert_eq!(nav["step"], "profile_info");
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn blocked_advance_is_a_noop() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        // No role chosen yet: the gate blocks and the cursor stays put.
        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["moved"], false);
        assert_eq!(nav["step"], "role_selection");

        // Same at the profile step with empty fields.
        set_field(&client, &base, &id, "role", json!("admin")).await;
        navigate(&client, &base, &id, "advance").await;
        let nav = navigate(&client, &base, &id, "advance").await;
        assert_eq!(nav["moved"], false);
        assert_eq!(nav["step"], "profile_info");
        assert_eq!(nav["advance_allowed"], false);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn role_change_on_setup_step_forces_confirmation() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        set_field(&client, &base, &id, "role", json!("department_head")).await;
        navigate(&client, &base, &id, "advance").await;
        fill_profile(&client, &base, &id).await;
        navigate(&client, &base, &id, "advance").await;

        set_field(&client, &base, &id, "setup_resources_requested", json!(true)).await;
        set_field(&client, &base, &id, "selected_resources", json!(["infrastructure"])).await;

        // Switching role away from DepartmentHead mid-setup jumps the
        // cursor to confirmation; the selection is retained but inert.
        let snap = set_field(&client, &base, &id, "role", json!("admin")).await;
        assert_eq!(snap["step"], "confirmation");
        assert_eq!(snap["record"]["selected_resources"], json!(["infrastructure"]));
        let summary = snap["summary"].as_str().unwrap();
        assert!(!summary.contains("Infrastructure"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        let resp = client
            .post(format!("{base}/api/wizard/{id}/field"))
            .json(&json!({"field": "favorite_color", "value": "blue"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);

        let resp = client
            .post(format!("{base}/api/wizard/{id}/field"))
            .json(&json!({"field": "role", "value": 42}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn unknown_session_is_404() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let bogus = uuid::Uuid::new_v4();

        let resp = client
            .get(format!("{base}/api/wizard/{bogus}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        let resp = client
            .post(format!("{base}/api/wizard/{bogus}/advance"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn submit_before_confirmation_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let (base, submitted) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        let resp = client
            .post(format!("{base}/api/wizard/{id}/submit"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
        assert!(submitted.lock().await.is_empty());

        // The session survives a rejected submit.
        let resp = client
            .get(format!("{base}/api/wizard/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn abandon_discards_the_session() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        let resp = client
            .delete(format!("{base}/api/wizard/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);

        let resp = client
            .get(format!("{base}/api/wizard/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn sessions_do_not_observe_each_other() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let a = create_session(&client, &base).await;
        let b = create_session(&client, &base).await;

        set_field(&client, &base, &a, "full_name", json!("Alice")).await;

        let resp = client
            .get(format!("{base}/api/wizard/{b}"))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["record"]["full_name"], "");
    })
    .await
    .unwrap();
}
