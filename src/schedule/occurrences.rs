use chrono::NaiveDate;

use super::recurrence::Recurrence;

/// Iterator over the occurrence dates of a task between two inclusive bounds.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    end: NaiveDate,
    recurrence: Recurrence,
}

impl Occurrences {
    pub fn new(start: NaiveDate, end: NaiveDate, recurrence: Recurrence) -> Self {
        Self {
            next: Some(start),
            end,
            recurrence,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|date| *date <= self.end)?;
        self.next = self.recurrence.advance(current);
        Some(current)
    }
}

/// Expands `start..=end` into occurrence dates. `start > end` yields nothing.
pub fn occurrence_dates(start: NaiveDate, end: NaiveDate, recurrence: Recurrence) -> Vec<NaiveDate> {
    Occurrences::new(start, end, recurrence).collect()
}
