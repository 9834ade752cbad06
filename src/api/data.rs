use axum::{extract::State, http::StatusCode, routing::{get, post}, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::app_state::AppState;
use crate::db::models::snapshot::Snapshot;
use crate::utils::api_response::ApiResponse;

pub fn data_routes() -> Router<AppState> {
    Router::new()
        .route("/data/export", get(export_data))
        .route("/data/import", post(import_data))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub employees: usize,
    pub tasks: usize,
    pub assignments: usize,
}

/// Export every record as one document
#[utoipa::path(
    get,
    path = "/data/export",
    responses(
        (status = 200, description = "All records", body = Snapshot),
        (status = 500, description = "Record store failure")
    ),
    tag = "Data"
)]
pub async fn export_data(
    State(state): State<AppState>,
) -> Result<ApiResponse<Snapshot>, ApiResponse<()>> {
    let snapshot = state.store.export_snapshot().await?;
    Ok(ApiResponse::success(StatusCode::OK, "Data exported", snapshot))
}

/// Replace all records with an exported document
///
/// The body is the raw document. It must carry `employees`, `tasks` and
/// `assignments`; nothing is changed if it does not.
#[utoipa::path(
    post,
    path = "/data/import",
    request_body(content = Snapshot, content_type = "application/json"),
    responses(
        (status = 200, description = "Data imported", body = ImportSummary),
        (status = 400, description = "Document is malformed or incomplete")
    ),
    tag = "Data"
)]
pub async fn import_data(
    State(state): State<AppState>,
    body: String,
) -> Result<ApiResponse<ImportSummary>, ApiResponse<()>> {
    let snapshot = Snapshot::from_json(&body).inspect_err(|e| {
        warn!("⚠️ Rejected import: {}", e);
    })?;
    state.store.import_snapshot(&snapshot).await?;

    let summary = ImportSummary {
        employees: snapshot.employees.len(),
        tasks: snapshot.tasks.len(),
        assignments: snapshot.assignments.len(),
    };
    info!(
        "📥 Imported {} employees, {} tasks, {} assignments",
        summary.employees, summary.tasks, summary.assignments
    );
    Ok(ApiResponse::success(StatusCode::OK, "Data imported", summary))
}

#[derive(OpenApi)]
#[openapi(
    paths(export_data, import_data),
    components(schemas(Snapshot, ImportSummary)),
    tags((name = "Data", description = "Backup and restore"))
)]
pub struct DataDoc;
