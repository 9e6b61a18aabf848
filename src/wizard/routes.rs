//! REST endpoints for driving wizard sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::SessionError;
use crate::sessions::SessionRegistry;
use crate::submit::SubmissionSink;

use super::model::Record;
use super::state::WizardStep;
use super::store::FormStore;

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub sessions: Arc<SessionRegistry>,
    pub sink: Arc<dyn SubmissionSink>,
}

/// Wire shape of a session snapshot.
#[derive(Debug, Serialize)]
struct SnapshotBody {
    session_id: Uuid,
    record: Record,
    step: WizardStep,
    step_index: u8,
    step_label: &'static str,
    advance_allowed: bool,
    visible_steps: Vec<WizardStep>,
    /// Review text, present only on the confirmation step.
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

fn snapshot_body(session_id: Uuid, store: &FormStore) -> SnapshotBody {
    let step = store.step();
    SnapshotBody {
        session_id,
        record: store.record().clone(),
        step,
        step_index: step.index(),
        step_label: step.label(),
        advance_allowed: store.is_advance_allowed(),
        visible_steps: store.visible_steps(),
        summary: step
            .is_terminal()
            .then(|| store.record().confirmation_summary()),
    }
}

#[derive(Debug, Deserialize)]
struct FieldUpdate {
    field: String,
    value: Value,
}

#[derive(Debug, Serialize)]
struct NavBody {
    moved: bool,
    #[serde(flatten)]
    snapshot: SnapshotBody,
}

fn session_error(err: SessionError) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

async fn health() -> impl IntoResponse {
    "ok"
}

/// POST /api/wizard
///
/// Start a new wizard session. Returns the session id and the initial
/// snapshot.
async fn create_session(State(state): State<WizardRouteState>) -> Response {
    let id = state.sessions.create().await;
    match state
        .sessions
        .with(id, |store| snapshot_body(id, store))
        .await
    {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(e) => session_error(e),
    }
}

/// GET /api/wizard/{id}
///
/// Snapshot of the session: record, current step, gate status, and the
/// steps visible for the current role.
async fn get_snapshot(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state
        .sessions
        .with(id, |store| snapshot_body(id, store))
        .await
    {
        Ok(body) => Json(body).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /api/wizard/{id}/field
///
/// Set a single record field. Unknown fields and malformed values are
/// integration errors and come back as 422.
async fn update_field(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FieldUpdate>,
) -> Response {
    let result = state
        .sessions
        .with_mut(id, |store| {
            store
                .update_field(&body.field, body.value)
                .map(|()| snapshot_body(id, store))
        })
        .await;

    match result {
        Ok(Ok(snapshot)) => Json(snapshot).into_response(),
        Ok(Err(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /api/wizard/{id}/advance
///
/// Request the next step. Blocked navigation is a no-op: `moved` is false
/// and the cursor stays put.
async fn advance(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state
        .sessions
        .with_mut(id, |store| NavBody {
            moved: store.advance(),
            snapshot: snapshot_body(id, store),
        })
        .await
    {
        Ok(body) => Json(body).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /api/wizard/{id}/retreat
///
/// Request the previous step. Never gated; a no-op only at the first step.
async fn retreat(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state
        .sessions
        .with_mut(id, |store| NavBody {
            moved: store.retreat(),
            snapshot: snapshot_body(id, store),
        })
        .await
    {
        Ok(body) => Json(body).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /api/wizard/{id}/submit
///
/// Hand the record to the submission sink and discard the session. Only a
/// session sitting at the confirmation step may submit. The sink's outcome
/// is logged but not interpreted; the session is gone either way.
async fn submit(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    let at_confirmation = match state
        .sessions
        .with(id, |store| store.step().is_terminal())
        .await
    {
        Ok(v) => v,
        Err(e) => return session_error(e),
    };
    if !at_confirmation {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "Wizard is not at the confirmation step"})),
        )
            .into_response();
    }

    let store = match state.sessions.remove(id).await {
        Ok(s) => s,
        Err(e) => return session_error(e),
    };

    if let Err(e) = state.sink.submit(store.record()).await {
        warn!(session_id = %id, "Submission sink failed: {}", e);
    }

    StatusCode::ACCEPTED.into_response()
}

/// DELETE /api/wizard/{id}
///
/// Abandon the session.
async fn abandon(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.sessions.remove(id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => session_error(e),
    }
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/wizard", post(create_session))
        .route("/api/wizard/{id}", get(get_snapshot).delete(abandon))
        .route("/api/wizard/{id}/field", post(update_field))
        .route("/api/wizard/{id}/advance", post(advance))
        .route("/api/wizard/{id}/retreat", post(retreat))
        .route("/api/wizard/{id}/submit", post(submit))
        .with_state(state)
}
