//! Duty-roster generation: occurrence dates, employee rotation, report rows.

pub mod occurrences;
pub mod ordering;
pub mod recurrence;
pub mod report;
pub mod rotation;
