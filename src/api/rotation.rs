use axum::{http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::app_state::AppState;
use crate::db::models::employee::Employee;
use crate::schedule::ordering::RotationOrder;
use crate::schedule::rotation::advance_rotation_cursor;
use crate::utils::api_response::ApiResponse;

// The rotation order and cursor live in the client for one report session;
// these endpoints apply the editing rules and hand the result back.
pub fn rotation_routes() -> Router<AppState> {
    Router::new()
        .route("/rotation-order/reorder", post(reorder_rotation))
        .route("/rotation-order/sync", post(sync_rotation))
        .route("/rotation-cursor/next", post(next_cursor))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub order: Vec<Employee>,
    pub source: usize,
    pub destination: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncRequest {
    pub order: Vec<Employee>,
    /// The new selection, in the order it was made.
    pub selected: Vec<Employee>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CursorRequest {
    pub cursor: usize,
    pub employee_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CursorResponse {
    pub cursor: usize,
}

/// Move one employee to a new position, shifting the ones in between
#[utoipa::path(
    post,
    path = "/rotation-order/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Order updated", body = Vec<Employee>),
        (status = 400, description = "Index out of bounds")
    ),
    tag = "Rotation"
)]
pub async fn reorder_rotation(
    Json(request): Json<ReorderRequest>,
) -> Result<ApiResponse<Vec<Employee>>, ApiResponse<()>> {
    let mut order = RotationOrder::from_selection(&request.order);
    order.reorder(request.source, request.destination)?;
    Ok(ApiResponse::success(StatusCode::OK, "Order updated", order.into_employees()))
}

/// Align the order with a changed selection
#[utoipa::path(
    post,
    path = "/rotation-order/sync",
    request_body = SyncRequest,
    responses(
        (status = 200, description = "Order synced", body = Vec<Employee>)
    ),
    tag = "Rotation"
)]
pub async fn sync_rotation(Json(request): Json<SyncRequest>) -> ApiResponse<Vec<Employee>> {
    let mut order = RotationOrder::from_selection(&request.order);
    order.sync_selection(&request.selected);
    ApiResponse::success(StatusCode::OK, "Order synced", order.into_employees())
}

/// Step the single-employee view to the next employee
#[utoipa::path(
    post,
    path = "/rotation-cursor/next",
    request_body = CursorRequest,
    responses(
        (status = 200, description = "Cursor advanced", body = CursorResponse)
    ),
    tag = "Rotation"
)]
pub async fn next_cursor(Json(request): Json<CursorRequest>) -> ApiResponse<CursorResponse> {
    let cursor = advance_rotation_cursor(request.cursor, request.employee_count);
    ApiResponse::success(StatusCode::OK, "Cursor advanced", CursorResponse { cursor })
}

#[derive(OpenApi)]
#[openapi(
    paths(reorder_rotation, sync_rotation, next_cursor),
    components(schemas(ReorderRequest, SyncRequest, CursorRequest, CursorResponse, Employee)),
    tags((name = "Rotation", description = "Rotation order and cursor editing"))
)]
pub struct RotationDoc;
