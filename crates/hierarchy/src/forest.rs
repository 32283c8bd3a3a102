//! Forest construction from manager references.
//!
//! Records are wired in two passes over index-addressed slots: the first
//! pass maps every id to its position, the second attaches each record to
//! its manager's child list. The owned tree is then assembled bottom-up in
//! reverse pre-order, so children are always finished before their parent
//! and building does not recurse.
//!
//! The derived `Clone`, `PartialEq` and `Drop` glue on [`EmployeeNode`] still
//! recurse once per level. Chains a few thousand levels deep are fine on a
//! default thread stack; much deeper ones are not.

use std::collections::HashMap;

use serde::Serialize;

use crate::flatten::PreOrder;
use crate::record::EmployeeRecord;

/// One employee plus their direct reports, ordered by `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeNode {
    #[serde(flatten)]
    pub record: EmployeeRecord,
    pub subordinates: Vec<EmployeeNode>,
}

impl EmployeeNode {
    pub fn new(record: EmployeeRecord) -> Self {
        Self {
            record,
            subordinates: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn has_subordinates(&self) -> bool {
        !self.subordinates.is_empty()
    }

    /// Number of direct reports.
    pub fn reports_count(&self) -> usize {
        self.subordinates.len()
    }

    /// This node plus every node below it.
    pub fn headcount(&self) -> usize {
        PreOrder::new(std::slice::from_ref(self)).count()
    }
}

/// Result of [`build_forest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forest {
    roots: Vec<EmployeeNode>,
    /// Ids of records caught in a manager cycle. They attach to each other
    /// but never to a root, so they cannot be reached from `roots`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    detached: Vec<String>,
}

impl Forest {
    pub fn roots(&self) -> &[EmployeeNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<EmployeeNode> {
        self.roots
    }

    pub fn detached(&self) -> &[String] {
        &self.detached
    }

    /// Pre-order walk over every reachable node with its depth.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(&self.roots)
    }

    /// Total number of reachable nodes across all levels.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of levels; zero for an empty forest.
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&EmployeeNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id() == id)
    }

    /// Whether `id` is reachable and has at least one direct report.
    pub fn has_subordinates(&self, id: &str) -> bool {
        self.find(id).is_some_and(EmployeeNode::has_subordinates)
    }
}

/// Builds the org chart for one listing of records.
///
/// A record becomes a root when its manager id is absent, unknown to this
/// input, or equal to its own id. Siblings and roots are stably ordered by
/// ascending `sort_order`. With duplicate ids the last record owns the id in
/// the lookup; every record still yields exactly one node.
pub fn build_forest(records: &[EmployeeRecord]) -> Forest {
    let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if lookup.insert(record.id.as_str(), index).is_some() {
            tracing::warn!(id = %record.id, "duplicate employee id in listing");
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match record
            .effective_manager_id()
            .and_then(|manager_id| lookup.get(manager_id).copied())
        {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }

    // Child lists were filled in input order, so a stable sort keeps ties.
    roots.sort_by_key(|&index| records[index].sort_order);
    for list in &mut children {
        list.sort_by_key(|&index| records[index].sort_order);
    }

    let order = pre_order(&roots, &children);
    let mut reached = vec![false; records.len()];
    let mut slots: Vec<Option<EmployeeNode>> = vec![None; records.len()];
    for &index in order.iter().rev() {
        reached[index] = true;
        let subordinates = children[index]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        slots[index] = Some(EmployeeNode {
            record: records[index].clone(),
            subordinates,
        });
    }

    let detached: Vec<String> = records
        .iter()
        .zip(&reached)
        .filter(|(_, reached)| !**reached)
        .map(|(record, _)| record.id.clone())
        .collect();
    if !detached.is_empty() {
        tracing::warn!(
            count = detached.len(),
            ids = ?detached,
            "employees in a manager cycle are unreachable from any root"
        );
    }

    let roots = roots
        .iter()
        .filter_map(|&index| slots[index].take())
        .collect::<Vec<_>>();
    tracing::debug!(
        records = records.len(),
        roots = roots.len(),
        "built employee forest"
    );

    Forest { roots, detached }
}

fn pre_order(roots: &[usize], children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(children.len());
    let mut visited = vec![false; children.len()];
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(index) = stack.pop() {
        if std::mem::replace(&mut visited[index], true) {
            continue;
        }
        order.push(index);
        stack.extend(children[index].iter().rev().copied());
    }
    order
}
