use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use socdash_metrics::{
    filter_by_range, render, summarize, ActiveView, Dashboard, DateRange, Session, Summary,
};

use crate::middleware::RequestId;

use super::{apply_filters, map_session_error, ApiError, ApiResponse, AppState, FilterParams};

#[derive(Debug, Serialize)]
pub(super) struct ViewItem {
    view: ActiveView,
    title: &'static str,
    default: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct SummaryData {
    range: Option<DateRange>,
    summary: Summary,
}

pub(super) async fn get_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<SummaryData>>, ApiError> {
    let table = &state.table;
    let mut session = Session::new(table.platform);
    apply_filters(&mut session, table, &params)
        .map_err(|e| map_session_error(req_id.0.clone(), "validation_error", &e))?;

    let summary = match &session.range {
        Some(range) => summarize(&filter_by_range(table, range)),
        None => summarize(table),
    };

    Ok(Json(ApiResponse::new(
        SummaryData {
            range: session.range,
            summary,
        },
        req_id.0,
    )))
}

pub(super) async fn list_views(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ViewItem>>> {
    let platform = state.table.platform;
    let default = ActiveView::default_for(platform);
    let data = ActiveView::for_platform(platform)
        .iter()
        .map(|&view| ViewItem {
            view,
            title: view.title(),
            default: view == default,
        })
        .collect();
    Json(ApiResponse::new(data, req_id.0))
}

/// Stateless render: a throwaway session built from the path and query.
pub(super) async fn render_view(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(view): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let table = &state.table;
    let view: ActiveView = view
        .parse()
        .map_err(|e| map_session_error(req_id.0.clone(), "not_found", &e))?;

    let mut session = Session::new(table.platform);
    session
        .select(view)
        .map_err(|e| map_session_error(req_id.0.clone(), "not_found", &e))?;
    apply_filters(&mut session, table, &params)
        .map_err(|e| map_session_error(req_id.0.clone(), "validation_error", &e))?;

    let dashboard = render(&session, table, state.options);
    Ok(Json(ApiResponse::new(dashboard, req_id.0)))
}
