use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::store::StoreError;
use crate::schedule::recurrence::Recurrence;

/// A task handed to an ordered list of employees over an optional period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Assignment {
    pub id: i64,
    pub task_id: i64,
    /// Rotation slots in order. The same id may appear more than once.
    pub employee_ids: Vec<i64>,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub end_date: Option<NaiveDate>,
}

/// Payload for creating an assignment, and for replacing one on update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAssignment {
    pub task_id: i64,
    pub employee_ids: Vec<i64>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub end_date: Option<NaiveDate>,
}

impl NewAssignment {
    /// Required fields only. An inverted period is accepted and simply
    /// produces an empty report.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.employee_ids.is_empty() {
            return Err(StoreError::Invalid(
                "an assignment needs at least one employee".into(),
            ));
        }
        Ok(())
    }
}

// =========================================================
// Serde helper: accept a plain day or a full timestamp
// =========================================================
use serde::de::Deserializer;

/// Reads `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the calendar day.
pub fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt_str: Option<String> = Option::deserialize(deserializer)?;
    match opt_str.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_day(s).map(Some).map_err(serde::de::Error::custom),
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.date_naive())
        .map_err(|e| format!("invalid date `{s}`: {e}"))
}
