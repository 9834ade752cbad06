//! The record store the rest of the crate depends on.

use async_trait::async_trait;
use chrono::{Months, NaiveDate, TimeZone, Utc};

use crate::db::models::{
    assignment::{Assignment, NewAssignment},
    employee::{Employee, NewEmployee},
    snapshot::Snapshot,
    task::{NewTask, Task},
};
use crate::schedule::recurrence::Recurrence;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("invalid import data: {0}")]
    InvalidImport(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Persisted employees, tasks and assignments.
///
/// Every call reads the current state; callers must not hold on to results
/// across operations. Ids are `max(existing) + 1`, starting at 1.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ───────────────────────────── Employees ─────────────────────────────

    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    async fn get_employee(&self, id: i64) -> StoreResult<Employee>;

    async fn create_employee(&self, new: &NewEmployee) -> StoreResult<Employee>;

    /// Replaces the employee's fields; the id never changes.
    async fn update_employee(&self, id: i64, update: &NewEmployee) -> StoreResult<Employee>;

    /// Assignments that reference the employee are left as they are.
    async fn delete_employee(&self, id: i64) -> StoreResult<()>;

    // ─────────────────────────────── Tasks ───────────────────────────────

    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn get_task(&self, id: i64) -> StoreResult<Task>;

    async fn create_task(&self, new: &NewTask) -> StoreResult<Task>;

    async fn update_task(&self, id: i64, update: &NewTask) -> StoreResult<Task>;

    async fn delete_task(&self, id: i64) -> StoreResult<()>;

    // ──────────────────────────── Assignments ────────────────────────────

    async fn list_assignments(&self) -> StoreResult<Vec<Assignment>>;

    async fn get_assignment(&self, id: i64) -> StoreResult<Assignment>;

    async fn create_assignment(&self, new: &NewAssignment) -> StoreResult<Assignment>;

    /// Replaces everything but the id and creation time.
    async fn update_assignment(&self, id: i64, update: &NewAssignment) -> StoreResult<Assignment>;

    async fn delete_assignment(&self, id: i64) -> StoreResult<()>;

    // ─────────────────────────── Data management ─────────────────────────

    async fn export_snapshot(&self) -> StoreResult<Snapshot>;

    /// Replaces all data with `snapshot`. Nothing is written if any record fails.
    async fn import_snapshot(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Cheap round trip to the backing storage.
    async fn ping(&self) -> StoreResult<()>;

    /// Loads [`sample_snapshot`] when the store holds no records at all.
    /// Returns whether anything was written.
    async fn seed_sample_data(&self, today: NaiveDate) -> StoreResult<bool> {
        if !self.export_snapshot().await?.is_empty() {
            return Ok(false);
        }
        self.import_snapshot(&sample_snapshot(today)).await?;
        Ok(true)
    }
}

/// Three employees, three tasks and one weekly assignment over the month
/// starting `today`.
pub fn sample_snapshot(today: NaiveDate) -> Snapshot {
    let employees = [(1, "Alice Moreira"), (2, "Bruno Costa"), (3, "Carla Nunes")]
        .into_iter()
        .map(|(id, name)| Employee {
            id,
            name: name.to_string(),
        })
        .collect();

    let tasks = [(1, "Office cleaning"), (2, "Document filing"), (3, "Front desk")]
        .into_iter()
        .map(|(id, description)| Task {
            id,
            description: description.to_string(),
        })
        .collect();

    let created_at = Utc.from_utc_datetime(&today.and_time(chrono::NaiveTime::MIN));

    Snapshot {
        employees,
        tasks,
        assignments: vec![Assignment {
            id: 1,
            task_id: 1,
            employee_ids: vec![1, 2, 3],
            recurrence: Recurrence::Weekly,
            created_at,
            start_date: Some(today),
            end_date: today.checked_add_months(Months::new(1)),
        }],
    }
}
