use crate::forest::EmployeeNode;

/// Keeps the nodes whose display name, designation or department contains
/// `query`, ignoring case.
///
/// Hierarchy is ignored: a match surfaces the person, not their ancestors.
/// An empty query returns the input unchanged.
pub fn filter_by_query<'a>(flat: &[&'a EmployeeNode], query: &str) -> Vec<&'a EmployeeNode> {
    if query.is_empty() {
        return flat.to_vec();
    }
    let needle = query.to_lowercase();
    flat.iter()
        .copied()
        .filter(|node| matches(node, &needle))
        .collect()
}

fn matches(node: &EmployeeNode, needle: &str) -> bool {
    let record = &node.record;
    contains(&record.display_name(), needle)
        || contains(&record.designation, needle)
        || record
            .department
            .as_deref()
            .is_some_and(|department| contains(department, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
