//! Undirected join graph mirrored from declared foreign keys.

use exemplar_core::models::SchemaSnapshot;
use rustc_hash::FxHashMap;

/// One adjacency entry: joining from the owning table to `neighbor`
/// uses `owner.local_column = neighbor.neighbor_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinEdge {
    pub neighbor: String,
    pub local_column: String,
    pub neighbor_column: String,
}

/// Table name to ordered edge list. Every table in the snapshot has an
/// entry, possibly empty. Edge order is insertion order and drives the
/// determinism of the planner.
#[derive(Debug, Clone, Default)]
pub struct JoinGraph {
    tables: Vec<String>,
    edges: FxHashMap<String, Vec<JoinEdge>>,
}

impl JoinGraph {
    /// Mirror every declared foreign key exactly once. Keys whose target
    /// table is not part of the snapshot are ignored. No edge is inferred.
    pub fn build(schema: &SchemaSnapshot) -> Self {
        let mut graph = Self::default();
        for table in &schema.tables {
            graph.add_table(&table.name);
        }
        for table in &schema.tables {
            for fk in &table.foreign_keys {
                if !graph.edges.contains_key(&fk.to_table) {
                    continue;
                }
                graph.push_edge(&table.name, &fk.to_table, &fk.from_column, &fk.to_column);
                graph.push_edge(&fk.to_table, &table.name, &fk.to_column, &fk.from_column);
            }
        }
        graph
    }

    fn add_table(&mut self, name: &str) {
        if !self.edges.contains_key(name) {
            self.tables.push(name.to_string());
            self.edges.insert(name.to_string(), Vec::new());
        }
    }

    fn push_edge(&mut self, from: &str, to: &str, local: &str, remote: &str) {
        if let Some(list) = self.edges.get_mut(from) {
            list.push(JoinEdge {
                neighbor: to.to_string(),
                local_column: local.to_string(),
                neighbor_column: remote.to_string(),
            });
        }
    }

    /// Edges of `table`; empty for isolated or unknown tables.
    pub fn neighbors(&self, table: &str) -> &[JoinEdge] {
        self.edges.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First edge from `from` to `to`, in insertion order.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<&JoinEdge> {
        self.neighbors(from).iter().find(|e| e.neighbor == to)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.edges.contains_key(table)
    }

    /// Tables in snapshot order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
