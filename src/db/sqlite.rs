use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use crate::db::models::{
    assignment::{Assignment, NewAssignment},
    employee::{Employee, NewEmployee},
    snapshot::Snapshot,
    task::{NewTask, Task},
};
use crate::db::pool::get_db_pool;
use crate::db::store::{RecordStore, StoreError, StoreResult};
use crate::schedule::recurrence::Recurrence;

/// [`RecordStore`] backed by a local SQLite file.
pub struct SqliteStore {
    pool: SqlitePool,
}

// =====================
// Row helpers
// =====================

#[derive(FromRow)]
struct AssignmentRow {
    id: i64,
    task_id: i64,
    recurrence: String,
    created_at: DateTime<Utc>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl AssignmentRow {
    fn into_assignment(self, employee_ids: Vec<i64>) -> Assignment {
        Assignment {
            id: self.id,
            task_id: self.task_id,
            employee_ids,
            recurrence: Recurrence::from_label(&self.recurrence),
            created_at: self.created_at,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

const ASSIGNMENT_COLUMNS: &str = "id, task_id, recurrence, created_at, start_date, end_date";

/// Writes the rotation slots of one assignment, in order.
async fn insert_slots(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    employee_ids: &[i64],
) -> Result<(), sqlx::Error> {
    for (position, employee_id) in employee_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO assignment_employees (assignment_id, position, employee_id)
             VALUES (?1, ?2, ?3)",
        )
        .bind(assignment_id)
        .bind(position as i64)
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn import_error(e: sqlx::Error, entity: &str, id: i64) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() || db.message().contains("UNIQUE constraint failed") => {
            StoreError::InvalidImport(format!("duplicate {entity} id {id}"))
        }
        _ => StoreError::Database(e),
    }
}

impl SqliteStore {
    pub async fn open(database_url: &str) -> StoreResult<Self> {
        let pool = get_db_pool(database_url).await?;
        Ok(Self { pool })
    }

    pub async fn open_in_memory() -> StoreResult<Self> {
        Self::open("sqlite::memory:").await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn slots_for(&self, assignment_id: i64) -> StoreResult<Vec<i64>> {
        let rows = sqlx::query_as::<_, (i64,)>(
            "SELECT employee_id FROM assignment_employees
             WHERE assignment_id = ?1 ORDER BY position ASC",
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    // ───────────────────────────── Employees ─────────────────────────────

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>("SELECT id, name FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn get_employee(&self, id: i64) -> StoreResult<Employee> {
        sqlx::query_as::<_, Employee>("SELECT id, name FROM employees WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: "employee", id })
    }

    async fn create_employee(&self, new: &NewEmployee) -> StoreResult<Employee> {
        new.validate()?;
        let id = sqlx::query("INSERT INTO employees (name) VALUES (?1)")
            .bind(&new.name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Employee {
            id,
            name: new.name.clone(),
        })
    }

    async fn update_employee(&self, id: i64, update: &NewEmployee) -> StoreResult<Employee> {
        update.validate()?;
        let result = sqlx::query("UPDATE employees SET name = ?1 WHERE id = ?2")
            .bind(&update.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "employee", id });
        }
        Ok(Employee {
            id,
            name: update.name.clone(),
        })
    }

    async fn delete_employee(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "employee", id });
        }
        Ok(())
    }

    // ─────────────────────────────── Tasks ───────────────────────────────

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT id, description FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get_task(&self, id: i64) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>("SELECT id, description FROM tasks WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: "task", id })
    }

    async fn create_task(&self, new: &NewTask) -> StoreResult<Task> {
        new.validate()?;
        let id = sqlx::query("INSERT INTO tasks (description) VALUES (?1)")
            .bind(&new.description)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Task {
            id,
            description: new.description.clone(),
        })
    }

    async fn update_task(&self, id: i64, update: &NewTask) -> StoreResult<Task> {
        update.validate()?;
        let result = sqlx::query("UPDATE tasks SET description = ?1 WHERE id = ?2")
            .bind(&update.description)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "task", id });
        }
        Ok(Task {
            id,
            description: update.description.clone(),
        })
    }

    async fn delete_task(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    // ──────────────────────────── Assignments ────────────────────────────

    async fn list_assignments(&self) -> StoreResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let slots = sqlx::query_as::<_, (i64, i64)>(
            "SELECT assignment_id, employee_id FROM assignment_employees
             ORDER BY assignment_id ASC, position ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_assignment: HashMap<i64, Vec<i64>> = HashMap::new();
        for (assignment_id, employee_id) in slots {
            by_assignment.entry(assignment_id).or_default().push(employee_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let employee_ids = by_assignment.remove(&row.id).unwrap_or_default();
                row.into_assignment(employee_ids)
            })
            .collect())
    }

    async fn get_assignment(&self, id: i64) -> StoreResult<Assignment> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound { entity: "assignment", id })?;

        let employee_ids = self.slots_for(id).await?;
        Ok(row.into_assignment(employee_ids))
    }

    async fn create_assignment(&self, new: &NewAssignment) -> StoreResult<Assignment> {
        new.validate()?;
        let created_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO assignments (task_id, recurrence, created_at, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(new.task_id)
        .bind(new.recurrence.label())
        .bind(created_at)
        .bind(new.start_date)
        .bind(new.end_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_slots(&mut *tx, id, &new.employee_ids).await?;
        tx.commit().await?;

        Ok(Assignment {
            id,
            task_id: new.task_id,
            employee_ids: new.employee_ids.clone(),
            recurrence: new.recurrence,
            created_at,
            start_date: new.start_date,
            end_date: new.end_date,
        })
    }

    async fn update_assignment(&self, id: i64, update: &NewAssignment) -> StoreResult<Assignment> {
        update.validate()?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE assignments
             SET task_id = ?1, recurrence = ?2, start_date = ?3, end_date = ?4
             WHERE id = ?5",
        )
        .bind(update.task_id)
        .bind(update.recurrence.label())
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "assignment", id });
        }

        sqlx::query("DELETE FROM assignment_employees WHERE assignment_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_slots(&mut *tx, id, &update.employee_ids).await?;
        tx.commit().await?;

        self.get_assignment(id).await
    }

    async fn delete_assignment(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM assignment_employees WHERE assignment_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "assignment", id });
        }
        tx.commit().await?;
        Ok(())
    }

    // ─────────────────────────── Data management ─────────────────────────

    async fn export_snapshot(&self) -> StoreResult<Snapshot> {
        Ok(Snapshot {
            employees: self.list_employees().await?,
            tasks: self.list_tasks().await?,
            assignments: self.list_assignments().await?,
        })
    }

    async fn import_snapshot(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for table in ["assignment_employees", "assignments", "tasks", "employees"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }

        for employee in &snapshot.employees {
            sqlx::query("INSERT INTO employees (id, name) VALUES (?1, ?2)")
                .bind(employee.id)
                .bind(&employee.name)
                .execute(&mut *tx)
                .await
                .map_err(|e| import_error(e, "employee", employee.id))?;
        }

        for task in &snapshot.tasks {
            sqlx::query("INSERT INTO tasks (id, description) VALUES (?1, ?2)")
                .bind(task.id)
                .bind(&task.description)
                .execute(&mut *tx)
                .await
                .map_err(|e| import_error(e, "task", task.id))?;
        }

        for assignment in &snapshot.assignments {
            sqlx::query(
                "INSERT INTO assignments (id, task_id, recurrence, created_at, start_date, end_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(assignment.id)
            .bind(assignment.task_id)
            .bind(assignment.recurrence.label())
            .bind(assignment.created_at)
            .bind(assignment.start_date)
            .bind(assignment.end_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| import_error(e, "assignment", assignment.id))?;

            insert_slots(&mut *tx, assignment.id, &assignment.employee_ids).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use crate::db::store::sample_snapshot;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(task_id: i64, employee_ids: Vec<i64>) -> NewAssignment {
        NewAssignment {
            task_id,
            employee_ids,
            recurrence: Recurrence::Weekly,
            start_date: Some(day(2024, 1, 1)),
            end_date: Some(day(2024, 1, 15)),
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_follow_the_highest() {
        let store = SqliteStore::open_in_memory().await.expect("open store");

        let ann = store.create_employee(&NewEmployee { name: "Ann".into() }).await.unwrap();
        let bob = store.create_employee(&NewEmployee { name: "Bob".into() }).await.unwrap();
        assert_eq!((ann.id, bob.id), (1, 2));

        store.delete_employee(ann.id).await.unwrap();
        let cid = store.create_employee(&NewEmployee { name: "Cid".into() }).await.unwrap();
        assert_eq!(cid.id, 3);

        let names: Vec<_> = store
            .list_employees()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["Bob", "Cid"]);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_records_fail_with_not_found() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        let err = store
            .update_task(42, &NewTask { description: "Sweep".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "task", id: 42 }));

        assert!(store.delete_employee(7).await.unwrap_err().is_not_found());
        assert!(store.get_assignment(1).await.unwrap_err().is_not_found());
        assert!(store.delete_assignment(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let err = store
            .create_employee(&NewEmployee { name: "   ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(store.list_employees().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn assignment_round_trip_keeps_slot_order() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        let created = store.create_assignment(&weekly(5, vec![3, 1, 2, 1])).await.unwrap();
        let fetched = store.get_assignment(created.id).await.unwrap();

        assert_eq!(fetched.employee_ids, vec![3, 1, 2, 1]);
        assert_eq!(fetched.recurrence, Recurrence::Weekly);
        assert_eq!(fetched.start_date, Some(day(2024, 1, 1)));
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_assignment_replaces_fields_but_keeps_creation_time() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let created = store.create_assignment(&weekly(1, vec![1, 2])).await.unwrap();

        let replacement = NewAssignment {
            task_id: 2,
            employee_ids: vec![2],
            recurrence: Recurrence::Monthly,
            start_date: None,
            end_date: None,
        };
        let updated = store.update_assignment(created.id, &replacement).await.unwrap();

        assert_eq!(updated.task_id, 2);
        assert_eq!(updated.employee_ids, vec![2]);
        assert_eq!(updated.recurrence, Recurrence::Monthly);
        assert_eq!(updated.start_date, None);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn deleting_an_employee_leaves_assignments_alone() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let ann = store.create_employee(&NewEmployee { name: "Ann".into() }).await.unwrap();
        let assignment = store.create_assignment(&weekly(1, vec![ann.id])).await.unwrap();

        store.delete_employee(ann.id).await.unwrap();

        let kept = store.get_assignment(assignment.id).await.unwrap();
        assert_eq!(kept.employee_ids, vec![ann.id]);
    }

    #[tokio::test]
    async fn import_replaces_everything_and_export_reads_it_back() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.create_task(&NewTask { description: "Old".into() }).await.unwrap();

        let snapshot = sample_snapshot(day(2024, 3, 1));
        store.import_snapshot(&snapshot).await.unwrap();

        let exported = store.export_snapshot().await.unwrap();
        assert_eq!(exported, snapshot);

        let next = store.create_task(&NewTask { description: "New".into() }).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn failed_import_writes_nothing() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.create_employee(&NewEmployee { name: "Keep".into() }).await.unwrap();

        let mut snapshot = sample_snapshot(day(2024, 3, 1));
        snapshot.employees.push(Employee { id: 1, name: "Clash".into() });

        let err = store.import_snapshot(&snapshot).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidImport(msg) if msg.contains("employee id 1")));

        let employees = store.list_employees().await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name, "Keep");
    }

    #[tokio::test]
    async fn sample_data_only_seeds_an_empty_store() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(store.seed_sample_data(day(2024, 1, 31)).await.unwrap());

        let assignment = store.get_assignment(1).await.unwrap();
        assert_eq!(assignment.end_date, Some(day(2024, 2, 29)));

        assert!(!store.seed_sample_data(day(2024, 1, 31)).await.unwrap());
        assert_eq!(store.list_employees().await.unwrap().len(), 3);
    }
}
