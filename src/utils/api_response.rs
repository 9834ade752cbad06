use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::db::store::StoreError;
use crate::schedule::ordering::OrderingError;
use crate::service::report::ReportError;

/// Envelope for every JSON reply the API sends.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn error(
        status: StatusCode,
        message: impl Into<String>,
        errors: Option<serde_json::Value>,
    ) -> Self {
        ApiResponse {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            data: None,
            errors,
        }
    }
}

impl From<StoreError> for ApiResponse<()> {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound { .. } => {
                ApiResponse::error(StatusCode::NOT_FOUND, err.to_string(), None)
            }
            StoreError::Invalid(_) | StoreError::InvalidImport(_) => {
                ApiResponse::error(StatusCode::BAD_REQUEST, err.to_string(), None)
            }
            StoreError::Database(_) | StoreError::Migration(_) | StoreError::Backend(_) => {
                error!("❌ Store failure: {}", err);
                ApiResponse::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Record store failure",
                    Some(json!({ "error": err.to_string() })),
                )
            }
        }
    }
}

impl From<ReportError> for ApiResponse<()> {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::Validation(field) => ApiResponse::error(
                StatusCode::BAD_REQUEST,
                message,
                Some(json!({ "missing": field })),
            ),
            ReportError::TooLarge { limit } => ApiResponse::error(
                StatusCode::BAD_REQUEST,
                message,
                Some(json!({ "limit": limit })),
            ),
            ReportError::Store(e) => e.into(),
        }
    }
}

impl From<OrderingError> for ApiResponse<()> {
    fn from(err: OrderingError) -> Self {
        ApiResponse::error(StatusCode::BAD_REQUEST, err.to_string(), None)
    }
}
