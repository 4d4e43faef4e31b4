//! Stateful dashboard sessions keyed by a server-issued UUID.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use socdash_metrics::{render, ActiveView, Dashboard, Session};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{apply_filters, map_session_error, ApiError, ApiResponse, AppState, FilterParams};

#[derive(Debug, Serialize)]
pub(super) struct SessionItem {
    session_id: String,
    session: Session,
}

#[derive(Debug, Serialize)]
pub(super) struct SessionDashboard {
    session_id: String,
    session: Session,
    dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectViewBody {
    view: String,
}

fn session_not_found(request_id: String, session_id: &str) -> ApiError {
    ApiError::new(
        request_id,
        "not_found",
        format!("session '{session_id}' not found"),
    )
}

pub(super) async fn create_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<SessionItem>>) {
    let session_id = Uuid::new_v4().to_string();
    let session = Session::new(state.table.platform);
    state
        .sessions
        .lock()
        .await
        .insert(session_id.clone(), session.clone());
    tracing::info!(session_id = %session_id, view = %session.active_view, "session created");

    (
        StatusCode::CREATED,
        Json(ApiResponse::new(
            SessionItem {
                session_id,
                session,
            },
            req_id.0,
        )),
    )
}

pub(super) async fn get_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionDashboard>>, ApiError> {
    let session = state
        .sessions
        .lock()
        .await
        .get(&session_id)
        .cloned()
        .ok_or_else(|| session_not_found(req_id.0.clone(), &session_id))?;

    let dashboard = render(&session, &state.table, state.options);
    Ok(Json(ApiResponse::new(
        SessionDashboard {
            session_id,
            session,
            dashboard,
        },
        req_id.0,
    )))
}

pub(super) async fn close_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .lock()
        .await
        .remove(&session_id)
        .ok_or_else(|| session_not_found(req_id.0.clone(), &session_id))?;
    tracing::info!(session_id = %session_id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn select_view(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
    Json(body): Json<SelectViewBody>,
) -> Result<Json<ApiResponse<SessionItem>>, ApiError> {
    let view: ActiveView = body
        .view
        .parse()
        .map_err(|e| map_session_error(req_id.0.clone(), "validation_error", &e))?;

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(req_id.0.clone(), &session_id))?;
    session
        .select(view)
        .map_err(|e| map_session_error(req_id.0.clone(), "validation_error", &e))?;

    Ok(Json(ApiResponse::new(
        SessionItem {
            session: session.clone(),
            session_id,
        },
        req_id.0,
    )))
}

pub(super) async fn set_filter(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
    Json(params): Json<FilterParams>,
) -> Result<Json<ApiResponse<SessionItem>>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(req_id.0.clone(), &session_id))?;
    apply_filters(session, &state.table, &params)
        .map_err(|e| map_session_error(req_id.0.clone(), "validation_error", &e))?;

    Ok(Json(ApiResponse::new(
        SessionItem {
            session: session.clone(),
            session_id,
        },
        req_id.0,
    )))
}
