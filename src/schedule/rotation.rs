use chrono::NaiveDate;

/// One employee on duty for one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duty<'a, E> {
    pub occurrence: usize,
    pub date: NaiveDate,
    pub employee: &'a E,
}

/// Maps occurrence dates onto the rotation `order`.
///
/// With rotation on and more than one employee, occurrence `i` goes to
/// `order[i % order.len()]`. Otherwise every employee is on duty for every
/// occurrence, in `order` sequence.
pub fn assign_duties<'a, E>(
    dates: &[NaiveDate],
    order: &'a [E],
    rotation_enabled: bool,
) -> Vec<Duty<'a, E>> {
    if order.is_empty() {
        return Vec::new();
    }

    if rotation_enabled && order.len() > 1 {
        dates
            .iter()
            .enumerate()
            .map(|(occurrence, date)| Duty {
                occurrence,
                date: *date,
                employee: &order[occurrence % order.len()],
            })
            .collect()
    } else {
        let mut duties = Vec::with_capacity(dates.len() * order.len());
        for (occurrence, date) in dates.iter().enumerate() {
            duties.extend(order.iter().map(|employee| Duty {
                occurrence,
                date: *date,
                employee,
            }));
        }
        duties
    }
}

/// Rows [`assign_duties`] produces for each occurrence.
pub fn duties_per_occurrence(order_len: usize, rotation_enabled: bool) -> usize {
    if rotation_enabled && order_len > 1 {
        1
    } else {
        order_len
    }
}

/// `(cursor + 1) mod employee_count`; stays at 0 when there is nobody to cycle.
/// Any incoming cursor is accepted, including ones past the end.
pub fn advance_rotation_cursor(cursor: usize, employee_count: usize) -> usize {
    if employee_count == 0 {
        0
    } else {
        (cursor % employee_count + 1) % employee_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::occurrences::occurrence_dates;
    use crate::schedule::recurrence::Recurrence;

    fn dates(count: u32) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, count).unwrap();
        occurrence_dates(start, end, Recurrence::Daily)
    }

    #[test]
    fn rotation_cycles_through_order() {
        let order = ["Ann", "Bob", "Cid"];
        let duties = assign_duties(&dates(7), &order, true);

        assert_eq!(duties.len(), 7);
        for (i, duty) in duties.iter().enumerate() {
            assert_eq!(*duty.employee, order[i % order.len()]);
            assert_eq!(duty.occurrence, i);
        }
    }

    #[test]
    fn rotation_with_single_employee_assigns_everyone_to_them() {
        let order = ["Ann"];
        let duties = assign_duties(&dates(4), &order, true);
        assert_eq!(duties.len(), 4);
        assert!(duties.iter().all(|d| *d.employee == "Ann"));
    }

    #[test]
    fn shared_duty_assigns_all_employees_per_date() {
        let order = ["Ann", "Bob", "Cid"];
        let occurrences = dates(5);
        let duties = assign_duties(&occurrences, &order, false);

        assert_eq!(duties.len(), 15);
        for (i, chunk) in duties.chunks(3).enumerate() {
            assert!(chunk.iter().all(|d| d.date == occurrences[i]));
            let names: Vec<_> = chunk.iter().map(|d| *d.employee).collect();
            assert_eq!(names, order);
        }
    }

    #[test]
    fn duplicate_entries_take_their_own_slot() {
        let order = ["Ann", "Bob", "Ann"];
        let duties = assign_duties(&dates(3), &order, true);
        let names: Vec<_> = duties.iter().map(|d| *d.employee).collect();
        assert_eq!(names, ["Ann", "Bob", "Ann"]);
    }

    #[test]
    fn empty_order_or_dates_produce_nothing() {
        let empty: [&str; 0] = [];
        assert!(assign_duties(&dates(3), &empty, true).is_empty());
        assert!(assign_duties(&[], &["Ann", "Bob"], false).is_empty());
    }

    #[test]
    fn duty_count_matches_assignment() {
        let order = ["Ann", "Bob", "Cid"];
        let occurrences = dates(4);
        for rotation in [true, false] {
            assert_eq!(
                assign_duties(&occurrences, &order, rotation).len(),
                occurrences.len() * duties_per_occurrence(order.len(), rotation)
            );
        }
        assert_eq!(duties_per_occurrence(1, true), 1);
        assert_eq!(duties_per_occurrence(0, false), 0);
    }

    #[test]
    fn cursor_wraps() {
        assert_eq!(advance_rotation_cursor(0, 3), 1);
        assert_eq!(advance_rotation_cursor(2, 3), 0);
        assert_eq!(advance_rotation_cursor(0, 1), 0);
        assert_eq!(advance_rotation_cursor(5, 0), 0);
    }

    #[test]
    fn cursor_past_the_end_wraps_without_overflow() {
        assert_eq!(advance_rotation_cursor(7, 3), 2);
        // usize::MAX % 3 == 0
        assert_eq!(advance_rotation_cursor(usize::MAX, 3), 1);
        assert_eq!(advance_rotation_cursor(usize::MAX, 1), 0);
        assert_eq!(advance_rotation_cursor(usize::MAX, usize::MAX), 1);
    }
}
