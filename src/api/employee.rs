use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::employee::{Employee, NewEmployee};
use crate::utils::api_response::ApiResponse;

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// List all employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "Employees retrieved", body = Vec<Employee>),
        (status = 500, description = "Record store failure")
    ),
    tag = "Employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Employee>>, ApiResponse<()>> {
    let employees = state.store.list_employees().await?;
    Ok(ApiResponse::success(StatusCode::OK, "Employees retrieved", employees))
}

/// Get a single employee by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Employee>, ApiResponse<()>> {
    let employee = state.store.get_employee(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Employee found", employee))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Name is missing")
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<NewEmployee>,
) -> Result<ApiResponse<Employee>, ApiResponse<()>> {
    let employee = state.store.create_employee(&payload).await?;
    info!("👤 Created employee {} ({})", employee.id, employee.name);
    Ok(ApiResponse::success(StatusCode::CREATED, "Employee created", employee))
}

/// Replace an employee's name
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    request_body = NewEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Name is missing"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewEmployee>,
) -> Result<ApiResponse<Employee>, ApiResponse<()>> {
    let employee = state.store.update_employee(id, &payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Employee updated", employee))
}

/// Delete an employee. Assignments that reference them are left untouched.
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiResponse<()>> {
    state.store.delete_employee(id).await?;
    info!("🗑️ Deleted employee {}", id);
    Ok(ApiResponse::success(StatusCode::OK, "Employee deleted", ()))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_employees, get_employee, create_employee, update_employee, delete_employee),
    components(schemas(Employee, NewEmployee)),
    tags((name = "Employees", description = "Employee records"))
)]
pub struct EmployeeDoc;
