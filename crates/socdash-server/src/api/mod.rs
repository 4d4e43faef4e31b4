mod sessions;
mod views;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use socdash_ingest::PostTable;
use socdash_metrics::{resolve_period, resolve_range, RenderOptions, Session, SessionError};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared server state: the dataset loaded at startup plus live sessions.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<PostTable>,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub options: RenderOptions,
}

impl AppState {
    pub fn new(table: PostTable, options: RenderOptions) -> Self {
        Self {
            table: Arc::new(table),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    platform: String,
    posts: usize,
}

/// Date filters accepted as query parameters or a JSON body.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FilterParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_session_error(request_id: String, code: &str, error: &SessionError) -> ApiError {
    tracing::debug!(error = %error, code, "request rejected");
    ApiError::new(request_id, code, error.to_string())
}

/// Applies `params` to `session` against `table`, replacing both filters.
pub(super) fn apply_filters(
    session: &mut Session,
    table: &PostTable,
    params: &FilterParams,
) -> Result<(), SessionError> {
    let range = resolve_range(table, params.start, params.end)?;
    let period = resolve_period(table, params.year, params.month)?;
    session.set_range(range);
    session.set_period(period);
    Ok(())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/summary", get(views::get_summary))
        .route("/api/v1/views", get(views::list_views))
        .route("/api/v1/views/{view}", get(views::render_view))
        .route("/api/v1/sessions", post(sessions::create_session))
        .route(
            "/api/v1/sessions/{session_id}",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route(
            "/api/v1/sessions/{session_id}/view",
            put(sessions::select_view),
        )
        .route(
            "/api/v1/sessions/{session_id}/filter",
            put(sessions::set_filter),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            platform: state.table.platform.to_string(),
            posts: state.table.len(),
        },
        req_id.0,
    ))
}
