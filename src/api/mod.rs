use axum::{middleware::from_fn, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::middleware::request_logger::log_requests;

pub mod assignment;
pub mod data;
pub mod employee;
pub mod health;
pub mod report;
pub mod rotation;
pub mod task;

/// Merged OpenAPI document for every route group.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    employee::EmployeeDoc::openapi()
        .merge_from(task::TaskDoc::openapi())
        .merge_from(assignment::AssignmentDoc::openapi())
        .merge_from(report::ReportDoc::openapi())
        .merge_from(rotation::RotationDoc::openapi())
        .merge_from(data::DataDoc::openapi())
}

pub fn build_router(state: AppState) -> Router {
    let doc = api_doc();

    Router::new()
        .merge(health::health_routes())
        .merge(employee::employee_routes())
        .merge(task::task_routes())
        .merge(assignment::assignment_routes())
        .merge(report::report_routes())
        .merge(rotation::rotation_routes())
        .merge(data::data_routes())
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", doc).path("/rapidoc"))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
