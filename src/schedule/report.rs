use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use utoipa::ToSchema;

use super::occurrences::occurrence_dates;
use super::ordering::RotationOrder;
use super::recurrence::Recurrence;
use super::rotation::assign_duties;
use crate::db::models::employee::Employee;

/// Blank line printed in the signature column.
pub const SIGNATURE_PLACEHOLDER: &str = "___________________________";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportRow {
    /// Position in generation order. Sorting falls back to it on ties.
    pub sequence: usize,
    pub date: NaiveDate,
    pub task_description: String,
    pub employee_id: i64,
    pub employee_name: String,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    EmployeeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportSort {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ReportSort {
    /// Column-header behaviour: the active column flips direction, any other
    /// column becomes active ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Returns `rows` in display order. Equal keys keep generation order.
pub fn sort_rows(mut rows: Vec<ReportRow>, key: SortKey, direction: SortDirection) -> Vec<ReportRow> {
    rows.sort_by(|a, b| {
        let primary = match key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::EmployeeName => locale_cmp(&a.employee_name, &b.employee_name),
        };
        direction.apply(primary).then(a.sequence.cmp(&b.sequence))
    });
    rows
}

/// Human ordering of names: letters first, then accents, then case
/// (lowercase first), then code points.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold_base(a)
        .cmp(&fold_base(b))
        .then_with(|| fold_case(a).cmp(&fold_case(b)))
        .then_with(|| case_pattern(a).cmp(&case_pattern(b)))
        .then_with(|| a.cmp(b))
}

fn fold_base(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_case(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

fn case_pattern(s: &str) -> Vec<bool> {
    s.nfd().map(char::is_uppercase).collect()
}

/// Inputs for one report generation.
#[derive(Debug, Clone)]
pub struct ReportParams<'a> {
    pub task_description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub recurrence: Recurrence,
    pub rotation_enabled: bool,
    pub order: &'a RotationOrder,
    pub sort: ReportSort,
}

/// A generated duty roster, ready for display or printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub task_description: String,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rotation_enabled: bool,
    /// The rotation order the rows were generated from.
    pub order: Vec<Employee>,
    pub sort: ReportSort,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn build(params: ReportParams<'_>) -> Self {
        let dates = occurrence_dates(params.start_date, params.end_date, params.recurrence);
        let rows = assign_duties(&dates, params.order.employees(), params.rotation_enabled)
            .into_iter()
            .enumerate()
            .map(|(sequence, duty)| ReportRow {
                sequence,
                date: duty.date,
                task_description: params.task_description.to_string(),
                employee_id: duty.employee.id,
                employee_name: duty.employee.name.clone(),
                signature: SIGNATURE_PLACEHOLDER.to_string(),
            })
            .collect();

        Self {
            task_description: params.task_description.to_string(),
            recurrence: params.recurrence,
            start_date: params.start_date,
            end_date: params.end_date,
            rotation_enabled: params.rotation_enabled,
            order: params.order.employees().to_vec(),
            sort: params.sort,
            rows: sort_rows(rows, params.sort.key, params.sort.direction),
        }
    }

    pub fn resort(&mut self, sort: ReportSort) {
        self.sort = sort;
        let rows = std::mem::take(&mut self.rows);
        self.rows = sort_rows(rows, sort.key, sort.direction);
    }

    /// Shared duty with several employees shows one employee's rows at a time.
    pub fn filters_by_employee(&self) -> bool {
        !self.rotation_enabled && self.order.len() > 1
    }

    /// The employee whose rows are shown at `cursor`, when filtering applies.
    pub fn employee_at(&self, cursor: usize) -> Option<&Employee> {
        if self.filters_by_employee() {
            self.order.get(cursor % self.order.len())
        } else {
            None
        }
    }

    pub fn visible_rows(&self, cursor: usize) -> Vec<&ReportRow> {
        match self.employee_at(cursor) {
            Some(employee) => self
                .rows
                .iter()
                .filter(|row| row.employee_id == employee.id)
                .collect(),
            None => self.rows.iter().collect(),
        }
    }

    /// Standalone printable page for the rows visible at `cursor`.
    pub fn render_html(&self, cursor: usize) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Task Assignment Report</title>\n<style>\n\
             body { font-family: Arial, sans-serif; margin: 20px; }\n\
             h1, h2 { text-align: center; }\n\
             table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }\n\
             th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
             th { background-color: #f2f2f2; }\n\
             </style>\n</head>\n<body>\n<h1>Task Assignment Report</h1>\n",
        );

        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&self.task_description)));
        html.push_str(&format!(
            "<p><strong>Period:</strong> {} to {}</p>\n",
            self.start_date.format("%d/%m/%Y"),
            self.end_date.format("%d/%m/%Y")
        ));
        html.push_str(&format!(
            "<p><strong>Recurrence:</strong> {}</p>\n",
            self.recurrence
        ));
        if let Some(employee) = self.employee_at(cursor) {
            html.push_str(&format!(
                "<p><strong>Employee:</strong> {}</p>\n",
                escape_html(&employee.name)
            ));
        }

        html.push_str("<table>\n<tr><th>Date</th><th>Employee</th><th>Signature</th></tr>\n");
        for row in self.visible_rows(cursor) {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                row.date.format("%d/%m/%Y"),
                escape_html(&row.employee_name),
                row.signature
            ));
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
