use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::assignment::{Assignment, NewAssignment};
use crate::schedule::recurrence::Recurrence;
use crate::utils::api_response::ApiResponse;

pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
}

/// List all assignments
#[utoipa::path(
    get,
    path = "/assignments",
    responses(
        (status = 200, description = "Assignments retrieved", body = Vec<Assignment>),
        (status = 500, description = "Record store failure")
    ),
    tag = "Assignments"
)]
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Assignment>>, ApiResponse<()>> {
    let assignments = state.store.list_assignments().await?;
    Ok(ApiResponse::success(StatusCode::OK, "Assignments retrieved", assignments))
}

/// Get a single assignment by ID
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment found", body = Assignment),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments"
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Assignment>, ApiResponse<()>> {
    let assignment = state.store.get_assignment(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Assignment found", assignment))
}

/// Create an assignment
///
/// Employee ids are kept in the given order, duplicates included. Ids of
/// employees or tasks that do not exist are accepted and resolved to
/// placeholders when a report is generated.
#[utoipa::path(
    post,
    path = "/assignments",
    request_body = NewAssignment,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "No employees given")
    ),
    tag = "Assignments"
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<NewAssignment>,
) -> Result<ApiResponse<Assignment>, ApiResponse<()>> {
    let assignment = state.store.create_assignment(&payload).await?;
    info!(
        "📌 Created assignment {} for task {} ({} slots)",
        assignment.id,
        assignment.task_id,
        assignment.employee_ids.len()
    );
    Ok(ApiResponse::success(StatusCode::CREATED, "Assignment created", assignment))
}

/// Replace an assignment; its id and creation time are kept
#[utoipa::path(
    put,
    path = "/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment ID")),
    request_body = NewAssignment,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 400, description = "No employees given"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments"
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewAssignment>,
) -> Result<ApiResponse<Assignment>, ApiResponse<()>> {
    let assignment = state.store.update_assignment(id, &payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Assignment updated", assignment))
}

#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments"
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiResponse<()>> {
    state.store.delete_assignment(id).await?;
    info!("🗑️ Deleted assignment {}", id);
    Ok(ApiResponse::success(StatusCode::OK, "Assignment deleted", ()))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_assignments, get_assignment, create_assignment, update_assignment, delete_assignment),
    components(schemas(Assignment, NewAssignment, Recurrence)),
    tags((name = "Assignments", description = "Tasks handed to employees on a recurrence"))
)]
pub struct AssignmentDoc;
