use crate::forest::{EmployeeNode, Forest};

/// Depth-first, parent-before-children walk over a slice of trees.
///
/// Yields `(depth, node)` with roots at depth zero. Sibling order is the
/// order already stored in each `subordinates` list.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a EmployeeNode)>,
}

impl<'a> PreOrder<'a> {
    pub fn new(roots: &'a [EmployeeNode]) -> Self {
        Self {
            stack: roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a EmployeeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack.extend(
            node.subordinates
                .iter()
                .rev()
                .map(|child| (depth + 1, child)),
        );
        Some((depth, node))
    }
}

/// Flattens the forest into one pre-order sequence for search mode.
pub fn flatten(forest: &Forest) -> Vec<&EmployeeNode> {
    forest.walk().map(|(_, node)| node).collect()
}
