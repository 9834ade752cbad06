use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::db::store::StoreError;

/// Shown in place of an employee that was deleted after being selected.
pub const MISSING_EMPLOYEE_NAME: &str = "Employee not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i64,
    pub name: String,
}

impl Employee {
    /// Stand-in for an id the store no longer knows about.
    pub fn missing(id: i64) -> Self {
        Self {
            id,
            name: MISSING_EMPLOYEE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewEmployee {
    pub name: String,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Invalid("employee name is required".into()));
        }
        Ok(())
    }
}
