use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::task::{Task, NewTask};
use crate::utils::api_response::ApiResponse;

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// List all tasks
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Tasks retrieved", body = Vec<Task>),
        (status = 500, description = "Record store failure")
    ),
    tag = "Tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Task>>, ApiResponse<()>> {
    let tasks = state.store.list_tasks().await?;
    Ok(ApiResponse::success(StatusCode::OK, "Tasks retrieved", tasks))
}

/// Get a single task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Task>, ApiResponse<()>> {
    let task = state.store.get_task(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Task found", task))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Description is missing")
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> Result<ApiResponse<Task>, ApiResponse<()>> {
    let task = state.store.create_task(&payload).await?;
    info!("📝 Created task {} ({})", task.id, task.description);
    Ok(ApiResponse::success(StatusCode::CREATED, "Task created", task))
}

/// Replace a task description
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = NewTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Description is missing"),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewTask>,
) -> Result<ApiResponse<Task>, ApiResponse<()>> {
    let task = state.store.update_task(id, &payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Task updated", task))
}

/// Delete a task. Assignments for it are left untouched.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiResponse<()>> {
    state.store.delete_task(id).await?;
    info!("🗑️ Deleted task {}", id);
    Ok(ApiResponse::success(StatusCode::OK, "Task deleted", ()))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, get_task, create_task, update_task, delete_task),
    components(schemas(Task, NewTask)),
    tags((name = "Tasks", description = "Tasks that can be assigned"))
)]
pub struct TaskDoc;
