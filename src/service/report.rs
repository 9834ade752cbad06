use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::db::models::{
    assignment::deserialize_optional_day,
    employee::Employee,
    task::{Task, MISSING_TASK_DESCRIPTION},
};
use crate::db::store::{RecordStore, StoreError};
use crate::schedule::{
    occurrences::Occurrences,
    ordering::RotationOrder,
    recurrence::Recurrence,
    report::{Report, ReportParams, ReportSort},
    rotation::duties_per_occurrence,
};

/// Largest roster a single request may produce.
pub const MAX_REPORT_ROWS: usize = 100_000;

/// Precondition that was not met when generating a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    DateRange,
    Task,
    Employees,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MissingField::DateRange => "a start and end date are required",
            MissingField::Task => "a task must be selected",
            MissingField::Employees => "at least one employee must be selected",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(MissingField),

    #[error("the report would exceed {limit} rows; narrow the date range")]
    TooLarge { limit: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn default_rotation() -> bool {
    true
}

/// Everything the report form submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportRequest {
    pub task_id: Option<i64>,
    #[serde(default)]
    pub employee_ids: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default = "default_rotation")]
    pub rotation_enabled: bool,
    /// Rotation order left by earlier edits. Synced against `employee_ids`
    /// before use; empty means selection order.
    #[serde(default)]
    pub current_order: Vec<i64>,
    #[serde(default)]
    pub sort: ReportSort,
}

/// Session options for generating from a stored assignment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentReportOptions {
    #[serde(default = "default_rotation")]
    pub rotation_enabled: bool,
    #[serde(default)]
    pub current_order: Vec<i64>,
    #[serde(default)]
    pub sort: ReportSort,
}

impl Default for AssignmentReportOptions {
    fn default() -> Self {
        Self {
            rotation_enabled: true,
            current_order: Vec::new(),
            sort: ReportSort::default(),
        }
    }
}

/// Generates the duty roster for `request` from the store's current records.
pub async fn generate_report(
    store: &dyn RecordStore,
    request: &ReportRequest,
) -> Result<Report, ReportError> {
    let (start_date, end_date) = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ReportError::Validation(MissingField::DateRange)),
    };
    let task_id = request
        .task_id
        .ok_or(ReportError::Validation(MissingField::Task))?;
    if request.employee_ids.is_empty() {
        return Err(ReportError::Validation(MissingField::Employees));
    }

    let task = match store.get_task(task_id).await {
        Ok(task) => task,
        Err(e) if e.is_not_found() => {
            warn!("⚠️ Report requested for missing task {}", task_id);
            Task {
                id: task_id,
                description: MISSING_TASK_DESCRIPTION.to_string(),
            }
        }
        Err(e) => return Err(e.into()),
    };

    let known: HashMap<i64, Employee> = store
        .list_employees()
        .await?
        .into_iter()
        .map(|employee| (employee.id, employee))
        .collect();
    let resolve = |ids: &[i64]| -> Vec<Employee> {
        ids.iter()
            .map(|id| {
                known.get(id).cloned().unwrap_or_else(|| {
                    warn!("⚠️ Employee {} no longer exists", id);
                    Employee::missing(*id)
                })
            })
            .collect()
    };

    let selected = resolve(&request.employee_ids);
    let mut order = if request.current_order.is_empty() {
        RotationOrder::from_selection(&selected)
    } else {
        RotationOrder::from_selection(&resolve(&request.current_order))
    };
    order.sync_selection(&selected);

    let per_date = duties_per_occurrence(order.len(), request.rotation_enabled);
    let occurrences = Occurrences::new(start_date, end_date, request.recurrence)
        .take(MAX_REPORT_ROWS + 1)
        .count();
    if occurrences.saturating_mul(per_date) > MAX_REPORT_ROWS {
        warn!(
            "⚠️ Refused report for task {}: {} to {} exceeds {} rows",
            task_id, start_date, end_date, MAX_REPORT_ROWS
        );
        return Err(ReportError::TooLarge {
            limit: MAX_REPORT_ROWS,
        });
    }

    let report = Report::build(ReportParams {
        task_description: &task.description,
        start_date,
        end_date,
        recurrence: request.recurrence,
        rotation_enabled: request.rotation_enabled,
        order: &order,
        sort: request.sort,
    });

    info!(
        "📋 Generated report for task {} with {} rows",
        task_id,
        report.rows.len()
    );
    Ok(report)
}

/// Generates the roster described by a stored assignment.
pub async fn report_for_assignment(
    store: &dyn RecordStore,
    assignment_id: i64,
    options: &AssignmentReportOptions,
) -> Result<Report, ReportError> {
    let assignment = store.get_assignment(assignment_id).await?;
    let request = ReportRequest {
        task_id: Some(assignment.task_id),
        employee_ids: assignment.employee_ids,
        start_date: assignment.start_date,
        end_date: assignment.end_date,
        recurrence: assignment.recurrence,
        rotation_enabled: options.rotation_enabled,
        current_order: options.current_order.clone(),
        sort: options.sort,
    };
    generate_report(store, &request).await
}
