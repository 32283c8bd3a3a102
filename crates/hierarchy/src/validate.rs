//! Manager assignment checks for record creation and updates.
//!
//! The forest builder tolerates bad manager references; these checks keep
//! them from being written in the first place.

use std::collections::{HashMap, HashSet};

use crate::error::{HierarchyError, Result};
use crate::record::EmployeeRecord;

/// Checks that `employee_id` (None for a record not yet created) may report
/// to `manager_id` given the currently stored `records`.
///
/// Rejects self-management, managers missing from `records`, and managers
/// whose own chain already leads back to `employee_id`.
pub fn validate_manager(
    records: &[EmployeeRecord],
    employee_id: Option<&str>,
    manager_id: &str,
) -> Result<()> {
    if employee_id == Some(manager_id) {
        return Err(HierarchyError::SelfManagement);
    }

    let managers: HashMap<&str, Option<&str>> = records
        .iter()
        .map(|record| (record.id.as_str(), record.effective_manager_id()))
        .collect();
    if !managers.contains_key(manager_id) {
        return Err(HierarchyError::UnknownManager(manager_id.to_string()));
    }

    let Some(employee_id) = employee_id else {
        return Ok(());
    };

    let mut visited = HashSet::new();
    let mut current = Some(manager_id);
    while let Some(id) = current {
        if id == employee_id {
            return Err(HierarchyError::ManagerCycle(manager_id.to_string()));
        }
        if !visited.insert(id) {
            // Existing data already loops without passing through us.
            break;
        }
        current = managers.get(id).copied().flatten();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<EmployeeRecord> {
        vec![
            EmployeeRecord::new("a", "Ana", "Ruiz", "CEO"),
            EmployeeRecord::new("b", "Ben", "Kato", "CTO").with_manager("a"),
            EmployeeRecord::new("c", "Cy", "Lund", "Engineer").with_manager("b"),
        ]
    }

    #[test]
    fn rejects_self_management() {
        let error = validate_manager(&chain(), Some("b"), "b").expect_err("self manager");
        assert_eq!(error, HierarchyError::SelfManagement);
    }

    #[test]
    fn rejects_unknown_manager() {
        let error = validate_manager(&chain(), None, "zz").expect_err("unknown manager");
        assert_eq!(error, HierarchyError::UnknownManager("zz".to_string()));
    }

    #[test]
    fn rejects_indirect_cycle() {
        let error = validate_manager(&chain(), Some("a"), "c").expect_err("cycle");
        assert_eq!(error, HierarchyError::ManagerCycle("c".to_string()));
    }

    #[test]
    fn accepts_valid_reassignment() {
        validate_manager(&chain(), Some("c"), "a").expect("c may report to a");
        validate_manager(&chain(), None, "c").expect("new hire may report to c");
    }

    #[test]
    fn terminates_on_existing_cycle() {
        let records = vec![
            EmployeeRecord::new("x", "Xi", "Wu", "Lead").with_manager("y"),
            EmployeeRecord::new("y", "Yu", "Li", "Lead").with_manager("x"),
            EmployeeRecord::new("z", "Zoe", "Park", "Analyst"),
        ];
        validate_manager(&records, Some("z"), "x").expect("z is outside the loop");
    }
}
