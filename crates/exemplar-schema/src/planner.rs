//! Breadth-first join planning over a [`JoinGraph`].

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::graph::JoinGraph;

/// A non-root table joined to an earlier table of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJoin {
    pub table: String,
    /// Position of `table` in [`JoinPlan::order`]; its alias suffix.
    pub index: usize,
    pub parent: String,
    pub parent_index: usize,
    /// Column on the parent side of the predicate.
    pub parent_column: String,
    /// Column on this table's side of the predicate.
    pub column: String,
}

/// Visitation order from a root plus the join predicate for each
/// non-root table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub order: Vec<String>,
    pub joins: Vec<PlannedJoin>,
    /// Tables in `order` for which no earlier table has an edge.
    pub dropped: Vec<String>,
}

impl JoinPlan {
    /// Plan the joins for `root`. Tables unreachable from `root` are simply
    /// absent from the plan.
    pub fn new(root: &str, graph: &JoinGraph) -> Self {
        let order = bfs_order(root, graph);
        let mut joins = Vec::with_capacity(order.len().saturating_sub(1));
        let mut dropped = Vec::new();

        for (index, table) in order.iter().enumerate().skip(1) {
            let parent = order[..index].iter().enumerate().find_map(|(parent_index, candidate)| {
                graph
                    .edge_between(candidate, table)
                    .map(|edge| (parent_index, candidate, edge))
            });
            match parent {
                Some((parent_index, parent, edge)) => joins.push(PlannedJoin {
                    table: table.clone(),
                    index,
                    parent: parent.clone(),
                    parent_index,
                    parent_column: edge.local_column.clone(),
                    column: edge.neighbor_column.clone(),
                }),
                None => {
                    warn!(root, table = %table, "no parent edge for planned table, dropping it");
                    dropped.push(table.clone());
                }
            }
        }

        Self {
            order,
            joins,
            dropped,
        }
    }

    pub fn root(&self) -> &str {
        &self.order[0]
    }

    /// Number of tables that actually appear in the query.
    pub fn table_count(&self) -> usize {
        1 + self.joins.len()
    }
}

/// FIFO traversal seeded with `root`; `order[0] == root`, no duplicates.
/// Neighbours are visited in edge insertion order.
pub fn bfs_order(root: &str, graph: &JoinGraph) -> Vec<String> {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(root);
    queue.push_back(root);
    while let Some(table) = queue.pop_front() {
        order.push(table.to_string());
        for edge in graph.neighbors(table) {
            if visited.insert(edge.neighbor.as_str()) {
                queue.push_back(edge.neighbor.as_str());
            }
        }
    }
    order
}
