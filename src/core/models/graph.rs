//! Directed immunization network

use super::Status;
use petgraph::graph::{DefaultIx, DiGraph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use std::fmt;

/// Node weights of the underlying petgraph graph. `None` marks a vertex that
/// never appeared as a row subject.
pub type VertexStatus = Option<Status>;

/// Directed graph with a fixed vertex count and an optional status per vertex
///
/// Vertex `i` is petgraph node index `i`. Parallel edges and self-loops are
/// kept as given.
#[derive(Debug, Clone, Default)]
pub struct ImmunizationGraph {
    graph: DiGraph<VertexStatus, ()>,
}

impl ImmunizationGraph {
    /// Largest vertex count the node index type can address
    ///
    /// The maximum index value is reserved by petgraph as the "no node" marker.
    #[must_use]
    pub fn max_vertices() -> usize {
        <DefaultIx as IndexType>::max().index()
    }

    /// Create a graph with `count` vertices, no edges and no statuses
    ///
    /// # Panics
    /// Panics if `count` exceeds [`max_vertices`](Self::max_vertices) or the
    /// allocation fails; loaders check the count first.
    #[must_use]
    pub fn with_vertices(count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(count, 0);
        for _ in 0..count {
            graph.add_node(None);
        }
        Self { graph }
    }

    /// Number of vertices
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges, counting duplicates
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check whether `vertex` is a valid index
    #[must_use]
    pub fn contains_vertex(&self, vertex: usize) -> bool {
        vertex < self.vertex_count()
    }

    /// Add a directed edge `from -> to`
    ///
    /// # Panics
    /// Panics if either vertex is out of range.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
    }

    /// Set the status of `vertex`, returning the previous one
    ///
    /// # Panics
    /// Panics if `vertex` is out of range.
    pub fn set_status(&mut self, vertex: usize, status: Status) -> VertexStatus {
        self.graph[NodeIndex::new(vertex)].replace(status)
    }

    /// Status of `vertex`; `None` if unassigned or out of range
    #[must_use]
    pub fn status(&self, vertex: usize) -> VertexStatus {
        self.graph.node_weight(NodeIndex::new(vertex)).copied().flatten()
    }

    /// Iterate `(vertex, status)` in vertex order
    pub fn statuses(&self) -> impl Iterator<Item = (usize, VertexStatus)> + '_ {
        self.graph
            .node_indices()
            .map(|index| (index.index(), self.graph[index]))
    }

    /// Iterate directed edges `(from, to)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Targets of the edges leaving `vertex`, in insertion order
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> Vec<usize> {
        self.edges()
            .filter(|&(from, _)| from == vertex)
            .map(|(_, to)| to)
            .collect()
    }

    /// Number of edges leaving `vertex`
    #[must_use]
    pub fn out_degree(&self, vertex: usize) -> usize {
        if !self.contains_vertex(vertex) {
            return 0;
        }
        self.graph.edges(NodeIndex::new(vertex)).count()
    }

    /// Number of vertices holding `status`
    #[must_use]
    pub fn count_with_status(&self, status: Status) -> usize {
        self.graph
            .node_weights()
            .filter(|weight| **weight == Some(status))
            .count()
    }

    /// Number of vertices that never received a status
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.graph.node_weights().filter(|w| w.is_none()).count()
    }

    /// Borrow the underlying petgraph graph
    #[must_use]
    pub const fn as_petgraph(&self) -> &DiGraph<VertexStatus, ()> {
        &self.graph
    }
}

impl fmt::Display for ImmunizationGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Immunization graph ({} vertices, {} edges):",
            self.vertex_count(),
            self.edge_count()
        )?;
        writeln!(f)?;

        let mut adjacency = vec![Vec::new(); self.vertex_count()];
        for (from, to) in self.edges() {
            adjacency[from].push(to.to_string());
        }

        for (vertex, status) in self.statuses() {
            let label = status.map_or("unassigned", Status::as_str);
            let targets = &adjacency[vertex];
            if targets.is_empty() {
                writeln!(f, "  {vertex} [{label}] → (no edges)")?;
            } else {
                writeln!(f, "  {vertex} [{label}] → {}", targets.join(", "))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation() {
        let graph = ImmunizationGraph::with_vertices(4);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.unassigned_count(), 4);
        assert!(graph.contains_vertex(3));
        assert!(!graph.contains_vertex(4));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ImmunizationGraph::with_vertices(0);
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.status(0), None);
        assert_eq!(graph.out_degree(0), 0);
    }

    #[test]
    fn test_duplicate_edges_and_self_loops_are_kept() {
        let mut graph = ImmunizationGraph::with_vertices(2);
        graph.add_edge(0, 1);
        graph.add_edge(0, 1);
        graph.add_edge(1, 1);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.out_degree(0), 2);
        assert_eq!(graph.neighbors(0), vec![1, 1]);
        assert_eq!(graph.neighbors(1), vec![1]);
    }

    #[test]
    fn test_neighbors_keep_insertion_order() {
        let mut graph = ImmunizationGraph::with_vertices(4);
        graph.add_edge(0, 3);
        graph.add_edge(1, 2);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);

        assert_eq!(graph.neighbors(0), vec![3, 1, 2]);
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![(0, 3), (1, 2), (0, 1), (0, 2)]
        );
    }

    #[test]
    fn test_set_status_returns_previous() {
        let mut graph = ImmunizationGraph::with_vertices(2);
        assert_eq!(graph.set_status(1, Status::Vulnerable), None);
        assert_eq!(
            graph.set_status(1, Status::Immunized),
            Some(Status::Vulnerable)
        );
        assert_eq!(graph.status(1), Some(Status::Immunized));
        assert_eq!(graph.status(0), None);
        assert_eq!(graph.count_with_status(Status::Immunized), 1);
        assert_eq!(graph.count_with_status(Status::Vulnerable), 0);
    }

    #[test]
    fn test_graph_display() {
        let mut graph = ImmunizationGraph::with_vertices(3);
        graph.set_status(0, Status::Immunized);
        graph.set_status(1, Status::Vulnerable);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);

        let display = format!("{graph}");
        assert!(display.contains("3 vertices, 2 edges"));
        assert!(display.contains("0 [immunized] → 1, 2"));
        assert!(display.contains("1 [vulnerable] → (no edges)"));
        assert!(display.contains("2 [unassigned]"));
    }
}
