use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::models::employee::Employee;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("index {index} is out of bounds for a rotation of {len} employees")]
    OutOfBounds { index: usize, len: usize },
}

/// Moves the element at `source` to `destination`, shifting everything in
/// between by one place.
pub fn reorder<T>(mut items: Vec<T>, source: usize, destination: usize) -> Result<Vec<T>, OrderingError> {
    check_bounds(items.len(), source, destination)?;
    if source == destination {
        return Ok(items);
    }

    let moved = items.remove(source);
    items.insert(destination, moved);
    Ok(items)
}

fn check_bounds(len: usize, source: usize, destination: usize) -> Result<(), OrderingError> {
    match [source, destination].into_iter().find(|index| *index >= len) {
        Some(index) => Err(OrderingError::OutOfBounds { index, len }),
        None => Ok(()),
    }
}

/// The employee sequence a report rotates through.
///
/// Lives only for one report-generation session; it is never written back to
/// the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationOrder {
    employees: Vec<Employee>,
}

impl RotationOrder {
    pub fn from_selection(selected: &[Employee]) -> Self {
        Self {
            employees: selected.to_vec(),
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn into_employees(self) -> Vec<Employee> {
        self.employees
    }

    pub fn ids(&self) -> Vec<i64> {
        self.employees.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn reorder(&mut self, source: usize, destination: usize) -> Result<(), OrderingError> {
        check_bounds(self.employees.len(), source, destination)?;
        let employees = std::mem::take(&mut self.employees);
        self.employees = reorder(employees, source, destination)?;
        Ok(())
    }

    /// Brings the order in line with a new selection.
    ///
    /// Entries no longer selected are dropped, survivors keep their relative
    /// order, and newly selected employees are appended in selection order.
    /// An id selected twice keeps two slots.
    pub fn sync_selection(&mut self, selected: &[Employee]) {
        let mut remaining: HashMap<i64, usize> = HashMap::new();
        for employee in selected {
            *remaining.entry(employee.id).or_default() += 1;
        }

        self.employees.retain(|employee| match remaining.get_mut(&employee.id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        });

        for employee in selected {
            if let Some(count) = remaining.get_mut(&employee.id) {
                if *count > 0 {
                    *count -= 1;
                    self.employees.push(employee.clone());
                }
            }
        }
    }
}
