use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::app_state::AppState;
use crate::db::models::employee::Employee;
use crate::schedule::recurrence::Recurrence;
use crate::schedule::report::{
    sort_rows, Report, ReportRow, ReportSort, SortDirection, SortKey,
};
use crate::service::report::{
    generate_report, report_for_assignment, AssignmentReportOptions, MissingField, ReportRequest,
};
use crate::utils::api_response::ApiResponse;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(create_report))
        .route("/reports/print", post(print_report))
        .route("/reports/sort", post(sort_report_rows))
        .route("/assignments/{id}/report", get(assignment_report))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, IntoParams)]
pub struct PrintParams {
    /// Rotation cursor selecting whose rows are printed for shared duty.
    #[serde(default)]
    pub cursor: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SortRowsRequest {
    pub rows: Vec<ReportRow>,
    /// Column header that was clicked.
    pub key: SortKey,
    /// Sort currently on display. Clicking its column again flips the direction.
    #[serde(default)]
    pub current: ReportSort,
    /// Explicit direction; skips the header toggle.
    pub direction: Option<SortDirection>,
}

impl SortRowsRequest {
    fn resolved_sort(&self) -> ReportSort {
        match self.direction {
            Some(direction) => ReportSort {
                key: self.key,
                direction,
            },
            None => self.current.toggle(self.key),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SortedRows {
    pub sort: ReportSort,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct AssignmentReportParams {
    /// Defaults to true
    pub rotation_enabled: Option<bool>,
    pub sort_key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl From<AssignmentReportParams> for AssignmentReportOptions {
    fn from(params: AssignmentReportParams) -> Self {
        Self {
            rotation_enabled: params.rotation_enabled.unwrap_or(true),
            current_order: Vec::new(),
            sort: ReportSort {
                key: params.sort_key.unwrap_or_default(),
                direction: params.direction.unwrap_or_default(),
            },
        }
    }
}

/// Generate a duty roster
#[utoipa::path(
    post,
    path = "/reports",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Report generated", body = Report),
        (status = 400, description = "Task, employees or date range missing")
    ),
    tag = "Reports"
)]
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<ApiResponse<Report>, ApiResponse<()>> {
    let report = generate_report(state.store.as_ref(), &request).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Report generated", report))
}

/// Printable HTML page for a roster
///
/// For shared duty with several employees only the employee at `cursor`
/// is printed.
#[utoipa::path(
    post,
    path = "/reports/print",
    params(PrintParams),
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Printable page", content_type = "text/html", body = String),
        (status = 400, description = "Task, employees or date range missing")
    ),
    tag = "Reports"
)]
pub async fn print_report(
    State(state): State<AppState>,
    Query(params): Query<PrintParams>,
    Json(request): Json<ReportRequest>,
) -> Result<Html<String>, ApiResponse<()>> {
    let report = generate_report(state.store.as_ref(), &request).await?;
    Ok(Html(report.render_html(params.cursor)))
}

/// Re-sort already generated rows without regenerating them
#[utoipa::path(
    post,
    path = "/reports/sort",
    request_body = SortRowsRequest,
    responses(
        (status = 200, description = "Rows sorted", body = SortedRows)
    ),
    tag = "Reports"
)]
pub async fn sort_report_rows(Json(request): Json<SortRowsRequest>) -> ApiResponse<SortedRows> {
    let sort = request.resolved_sort();
    let rows = sort_rows(request.rows, sort.key, sort.direction);
    ApiResponse::success(StatusCode::OK, "Rows sorted", SortedRows { sort, rows })
}

/// Generate the roster for a stored assignment
#[utoipa::path(
    get,
    path = "/assignments/{id}/report",
    params(
        ("id" = i64, Path, description = "Assignment ID"),
        AssignmentReportParams
    ),
    responses(
        (status = 200, description = "Report generated", body = Report),
        (status = 400, description = "Assignment has no date range"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Reports"
)]
pub async fn assignment_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AssignmentReportParams>,
) -> Result<ApiResponse<Report>, ApiResponse<()>> {
    let options = AssignmentReportOptions::from(params);
    let report = report_for_assignment(state.store.as_ref(), id, &options).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Report generated", report))
}

#[derive(OpenApi)]
#[openapi(
    paths(create_report, print_report, sort_report_rows, assignment_report),
    components(schemas(
        ReportRequest, Report, ReportRow, ReportSort, SortKey, SortDirection,
        SortRowsRequest, SortedRows, MissingField, Recurrence, Employee
    )),
    tags((name = "Reports", description = "Duty roster generation"))
)]
pub struct ReportDoc;
