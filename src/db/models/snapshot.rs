use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assignment::Assignment, employee::Employee, task::Task};
use crate::db::store::StoreError;

/// Every record in the store, as written by export and read by import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Snapshot {
    pub employees: Vec<Employee>,
    pub tasks: Vec<Task>,
    pub assignments: Vec<Assignment>,
}

impl Snapshot {
    /// Parses an exported document. All three collections must be present.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::InvalidImport(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty() && self.tasks.is_empty() && self.assignments.is_empty()
    }
}
