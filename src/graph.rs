//! Undirected pairing-adjacency graph.
//!
//! Nodes are pairing ids; edges grow lazily as agents reference new
//! adjacent pairs during construction. Each edge carries one position
//! scalar per agent, stored as a single contiguous vector — petgraph's
//! own edge storage is already a flat, append-only vector indexed by a
//! monotonically increasing [`EdgeIndex`], so no bespoke flat-vector
//! redesign is needed on top of it.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};

/// Per-agent position scalars carried by one edge.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    position: Vec<f64>,
}

impl EdgeWeight {
    fn new(position: Vec<f64>) -> Self {
        Self { position }
    }
}

/// Graph over pairing ids, with lazily-created edges.
#[derive(Debug, Clone, Default)]
pub struct PairingGraph {
    graph: UnGraph<u32, EdgeWeight>,
    nodes: HashMap<u32, NodeIndex>,
}

impl PairingGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            nodes: HashMap::new(),
        }
    }

    /// Ensures a node exists for `pairing_id`, creating it if needed.
    pub fn ensure_node(&mut self, pairing_id: u32) -> NodeIndex {
        *self
            .nodes
            .entry(pairing_id)
            .or_insert_with(|| self.graph.add_node(pairing_id))
    }

    fn edge_index(&self, src: u32, goal: u32) -> Option<EdgeIndex> {
        let a = *self.nodes.get(&src)?;
        let b = *self.nodes.get(&goal)?;
        self.graph.find_edge(a, b)
    }

    /// Returns the edge between `src` and `goal` if it already exists,
    /// creating it (with `agents` freshly initialized positions) otherwise.
    pub fn ensure_edge<F>(&mut self, src: u32, goal: u32, agents: usize, mut init: F) -> EdgeIndex
    where
        F: FnMut() -> f64,
    {
        if let Some(e) = self.edge_index(src, goal) {
            return e;
        }
        let a = self.ensure_node(src);
        let b = self.ensure_node(goal);
        let position = (0..agents).map(|_| init()).collect();
        self.graph.add_edge(a, b, EdgeWeight::new(position))
    }

    /// The position held by `agent` on the edge `(src, goal)`, or `1.0`
    /// if no such edge exists yet (the default weight used by the
    /// solution constructor).
    pub fn position_or_default(&self, src: u32, goal: u32, agent: usize) -> f64 {
        self.edge_index(src, goal)
            .and_then(|e| self.graph.edge_weight(e))
            .and_then(|w| w.position.get(agent).copied())
            .unwrap_or(1.0)
    }

    pub fn position(&self, edge: EdgeIndex, agent: usize) -> Option<f64> {
        self.graph.edge_weight(edge)?.position.get(agent).copied()
    }

    pub fn set_position(&mut self, edge: EdgeIndex, agent: usize, value: f64) {
        if let Some(w) = self.graph.edge_weight_mut(edge) {
            if let Some(slot) = w.position.get_mut(agent) {
                *slot = value;
            }
        }
    }

    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(u32, u32)> {
        let (a, b) = self.graph.edge_endpoints(edge)?;
        Some((self.graph[a], self.graph[b]))
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
