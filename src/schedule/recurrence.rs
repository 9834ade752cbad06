use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Step between two successive occurrences of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Recurrence {
    /// Parses a stored or submitted label. Anything unrecognised advances daily.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "weekly" => Recurrence::Weekly,
            "biweekly" => Recurrence::Biweekly,
            "monthly" => Recurrence::Monthly,
            _ => Recurrence::Daily,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Monthly => "monthly",
        }
    }

    /// Next occurrence after `date`, or `None` once the calendar runs out.
    ///
    /// Monthly steps add one calendar month and clamp to the last day of a
    /// shorter month: 2024-01-31 -> 2024-02-29. The clamped day is what the
    /// following step starts from, so the series continues 2024-03-29.
    pub fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Biweekly => date.checked_add_days(Days::new(14)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Recurrence::from_label(&label))
    }
}
