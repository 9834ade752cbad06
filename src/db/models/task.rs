use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::db::store::StoreError;

/// Shown in place of a task that was deleted after being selected.
pub const MISSING_TASK_DESCRIPTION: &str = "Task not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewTask {
    pub description: String,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.description.trim().is_empty() {
            return Err(StoreError::Invalid("task description is required".into()));
        }
        Ok(())
    }
}
