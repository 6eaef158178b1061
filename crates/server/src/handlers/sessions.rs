//! # Session Handlers
//!
//! Each session wraps one `Workflow`. Every handler answers with the current
//! `SessionView`; the pending notice is handed out once and then cleared.
//! Model failures show up in that notice, never as an HTTP error.

use super::{wrap_response, ApiResponse, AppError, AppJson, AppState, DebugParams};
use crate::{
    sessions::SharedWorkflow,
    types::{CopyResponse, OptionRequest, QuestionRequest, SessionView},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use promptplus::{MemoryClipboard, Workflow};
use serde_json::json;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

type SessionResponse = Result<Json<ApiResponse<SessionView>>, AppError>;

fn session_view(id: Uuid, workflow: &mut Workflow) -> SessionView {
    let now = Instant::now();
    let question = workflow.question().to_string();
    SessionView {
        id,
        step: workflow.step(),
        question_chars: question.chars().count(),
        question,
        pending: workflow.pending(),
        notice: workflow.take_notice(),
        form: workflow.form(),
        result: workflow.result_view(now),
    }
}

async fn find_session(app_state: &AppState, id: Uuid) -> Result<SharedWorkflow, AppError> {
    app_state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id}")))
}

/// Renders the view, adding the analysis to the debug block when asked for.
async fn respond(id: Uuid, workflow: &SharedWorkflow, debug_params: Query<DebugParams>) -> SessionResponse {
    let mut guard = workflow.lock().await;
    let debug_info = guard
        .state()
        .analysis()
        .map(|analysis| json!({ "analysis": analysis }));
    let view = session_view(id, &mut guard);
    Ok(wrap_response(view, debug_params, debug_info))
}

pub async fn create_session_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Result<(StatusCode, Json<ApiResponse<SessionView>>), AppError> {
    let (id, workflow) = app_state.sessions.create().await;
    info!(session = %id, "Created session");
    let response = respond(id, &workflow, debug_params).await?;
    Ok((StatusCode::CREATED, response))
}

pub async fn get_session_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    respond(id, &workflow, debug_params).await
}

pub async fn delete_session_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if app_state.sessions.remove(&id).await {
        info!(session = %id, "Deleted session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id}")))
    }
}

pub async fn set_question_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    AppJson(payload): AppJson<QuestionRequest>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    workflow.lock().await.set_question(&payload.question);
    respond(id, &workflow, debug_params).await
}

pub async fn analyze_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    info!(session = %id, "Analyze requested");
    app_state.perfector.analyze(&workflow).await;
    respond(id, &workflow, debug_params).await
}

pub async fn quick_generate_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    info!(session = %id, "Quick generate requested");
    app_state.perfector.quick_generate(&workflow).await;
    respond(id, &workflow, debug_params).await
}

pub async fn select_option_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    AppJson(payload): AppJson<OptionRequest>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    workflow
        .lock()
        .await
        .select_option(&payload.key, &payload.value);
    respond(id, &workflow, debug_params).await
}

pub async fn generate_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    info!(session = %id, "Generate requested");
    app_state.perfector.generate(&workflow).await;
    respond(id, &workflow, debug_params).await
}

pub async fn back_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    workflow.lock().await.back_to_options();
    respond(id, &workflow, debug_params).await
}

pub async fn edit_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    workflow.lock().await.back_to_input();
    respond(id, &workflow, debug_params).await
}

pub async fn reset_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> SessionResponse {
    let workflow = find_session(&app_state, id).await?;
    workflow.lock().await.reset();
    respond(id, &workflow, debug_params).await
}

/// Copies the optimized prompt and returns it for the browser clipboard.
pub async fn copy_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<CopyResponse>>, AppError> {
    let workflow = find_session(&app_state, id).await?;
    let clipboard = MemoryClipboard::new();
    let mut guard = workflow.lock().await;
    guard.copy(&clipboard, Instant::now());
    let session = session_view(id, &mut guard);
    Ok(wrap_response(
        CopyResponse {
            text: clipboard.contents(),
            session,
        },
        debug_params,
        None,
    ))
}
