use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use tracing::debug;

use super::cost::{CongestionModel, TravelTime, UNREACHABLE};
use super::edge::Edge;
use super::error::NetworkError;
use super::node::Node;
use super::topology::Topology;
use super::NodeId;

/// Road network: static topology plus dynamic per-edge occupancy.
///
/// # Invariants
///
/// - Nodes and edges are only added, never removed
/// - An undirected link is stored as two directed edges with independent
///   occupancy counters; entering `A → B` never changes `B → A`
/// - Occupancy is only mutated through [`enter`](Self::enter),
///   [`exit`](Self::exit) and [`clear_occupancy`](Self::clear_occupancy)
///
/// # Example
///
/// ```ignore
/// let mut network = RoadNetwork::new();
/// network.add_node(1, true)?;
/// network.add_node(2, false)?;
/// network.add_edge(1, 2, false)?;
/// assert_eq!(network.neighbors(2), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: StableGraph<Node, Edge, Directed>,
    index_by_id: HashMap<NodeId, NodeIndex>,
    congestion: CongestionModel,
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::with_congestion(CongestionModel::default())
    }

    pub fn with_congestion(congestion: CongestionModel) -> Self {
        Self {
            graph: StableGraph::default(),
            index_by_id: HashMap::new(),
            congestion,
        }
    }

    /// Builds a network from ordered declarations.
    ///
    /// # Errors
    ///
    /// - `DuplicateNode` if a node id is declared twice
    /// - `InvalidTopology` if an edge references an undeclared node
    pub fn from_topology(
        topology: &Topology,
        congestion: CongestionModel,
    ) -> Result<Self, NetworkError> {
        let mut network = Self::with_congestion(congestion);
        for decl in &topology.nodes {
            network.add_node(decl.id, decl.is_intersection)?;
        }
        for decl in &topology.edges {
            network.add_edge_with_base_time(decl.from, decl.to, decl.directed, decl.base_time)?;
        }
        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "road network loaded"
        );
        Ok(network)
    }

    pub fn congestion(&self) -> &CongestionModel {
        &self.congestion
    }

    pub fn set_congestion(&mut self, congestion: CongestionModel) {
        self.congestion = congestion;
    }

    pub fn add_node(&mut self, id: NodeId, is_intersection: bool) -> Result<(), NetworkError> {
        if self.index_by_id.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        let index = self.graph.add_node(Node::new(id, is_intersection));
        self.index_by_id.insert(id, index);
        Ok(())
    }

    /// Adds a normal road segment (base time 1).
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, directed: bool) -> Result<(), NetworkError> {
        self.add_edge_with_base_time(from, to, directed, 1.0)
    }

    /// Adds `from → to`, plus `to → from` when `directed` is false.
    ///
    /// Re-declaring an existing directed edge is a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidTopology` if either endpoint is not registered
    pub fn add_edge_with_base_time(
        &mut self,
        from: NodeId,
        to: NodeId,
        directed: bool,
        base_time: f64,
    ) -> Result<(), NetworkError> {
        let a = self
            .index(from)
            .ok_or(NetworkError::InvalidTopology { from, to, missing: from })?;
        let b = self
            .index(to)
            .ok_or(NetworkError::InvalidTopology { from, to, missing: to })?;

        self.insert_directed(a, b, base_time);
        if !directed {
            self.insert_directed(b, a, base_time);
        }
        Ok(())
    }

    fn insert_directed(&mut self, a: NodeIndex, b: NodeIndex, base_time: f64) {
        if self.graph.find_edge(a, b).is_some() {
            return;
        }
        self.graph.add_edge(a, b, Edge::new(base_time));
    }

    fn index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index_by_id.get(&id).copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index(id).and_then(|n| self.graph.node_weight(n))
    }

    /// All node ids, ascending.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.index_by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing neighbours of `id`, ascending. Empty for unknown nodes.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let Some(index) = self.index(id) else {
            return Vec::new();
        };
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(|node| node.id))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        let e = self.graph.find_edge(self.index(from)?, self.index(to)?)?;
        self.graph.edge_weight(e)
    }

    fn edge_mut(&mut self, from: NodeId, to: NodeId) -> Result<&mut Edge, NetworkError> {
        let found = match (self.index(from), self.index(to)) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b),
            _ => None,
        };
        found
            .and_then(|e| self.graph.edge_weight_mut(e))
            .ok_or(NetworkError::NoSuchEdge { from, to })
    }

    /// Iterates `(from, to, edge)` over every directed edge.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Edge)> {
        self.graph.edge_references().filter_map(move |e| {
            let from = self.graph.node_weight(e.source())?.id;
            let to = self.graph.node_weight(e.target())?.id;
            Some((from, to, e.weight()))
        })
    }

    pub fn occupancy(&self, from: NodeId, to: NodeId) -> Option<u32> {
        self.edge(from, to).map(Edge::occupancy)
    }

    /// Sum of all edge occupancies.
    pub fn total_occupancy(&self) -> u64 {
        self.edges().map(|(_, _, e)| u64::from(e.occupancy())).sum()
    }

    /// Registers one vehicle on `from → to`; returns the post-entry occupancy.
    pub fn enter(&mut self, from: NodeId, to: NodeId) -> Result<u32, NetworkError> {
        Ok(self.edge_mut(from, to)?.enter())
    }

    /// Releases one vehicle from `from → to`; returns the remaining occupancy.
    ///
    /// # Errors
    ///
    /// - `NoSuchEdge` if the edge does not exist
    /// - `OccupancyUnderflow` if the edge is already empty
    pub fn exit(&mut self, from: NodeId, to: NodeId) -> Result<u32, NetworkError> {
        self.edge_mut(from, to)?
            .exit()
            .ok_or(NetworkError::OccupancyUnderflow { from, to })
    }

    /// Zeroes every occupancy counter.
    pub fn clear_occupancy(&mut self) {
        let edges: Vec<_> = self.graph.edge_indices().collect();
        for e in edges {
            if let Some(edge) = self.graph.edge_weight_mut(e) {
                edge.clear();
            }
        }
    }

    /// Congestion-aware time to traverse `from → to` at the edge's current
    /// occupancy. Returns [`UNREACHABLE`] when there is no such edge.
    pub fn travel_time(&self, from: NodeId, to: NodeId) -> TravelTime {
        match (self.edge(from, to), self.node(to)) {
            (Some(edge), Some(arrival)) => self.congestion.travel_time(edge, arrival),
            _ => UNREACHABLE,
        }
    }

    /// Like [`travel_time`](Self::travel_time) with occupancy read as 0.
    pub fn free_flow_time(&self, from: NodeId, to: NodeId) -> TravelTime {
        match (self.edge(from, to), self.node(to)) {
            (Some(edge), Some(arrival)) => self.congestion.travel_time_at(edge, 0, arrival),
            _ => UNREACHABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::cost::is_unreachable;

    fn line() -> RoadNetwork {
        let topology = Topology::new()
            .node(1, false)
            .node(2, true)
            .node(3, false)
            .edge(1, 2, false)
            .edge(2, 3, true);
        RoadNetwork::from_topology(&topology, CongestionModel::default()).unwrap()
    }

    #[test]
    fn undirected_edge_registers_both_directions() {
        let network = line();
        assert_eq!(network.neighbors(1), vec![2]);
        assert_eq!(network.neighbors(2), vec![1, 3]);
        assert!(network.neighbors(3).is_empty());
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn directions_have_independent_occupancy() {
        let mut network = line();
        network.enter(1, 2).unwrap();
        assert_eq!(network.occupancy(1, 2), Some(1));
        assert_eq!(network.occupancy(2, 1), Some(0));
    }

    #[test]
    fn edge_to_unknown_node_is_invalid_topology() {
        let mut network = line();
        let err = network.add_edge(3, 9, true).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InvalidTopology {
                from: 3,
                to: 9,
                missing: 9
            }
        );
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut network = line();
        assert_eq!(network.add_node(2, false), Err(NetworkError::DuplicateNode(2)));
    }

    #[test]
    fn redeclared_edge_is_noop() {
        let mut network = line();
        network.add_edge(1, 2, true).unwrap();
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn exit_without_enter_is_refused() {
        let mut network = line();
        assert_eq!(
            network.exit(1, 2),
            Err(NetworkError::OccupancyUnderflow { from: 1, to: 2 })
        );
        assert_eq!(
            network.exit(3, 1),
            Err(NetworkError::NoSuchEdge { from: 3, to: 1 })
        );
    }

    #[test]
    fn travel_time_uses_occupancy_and_intersection() {
        let mut network = line();
        assert!((network.travel_time(1, 2).value() - 4.0).abs() < 1e-12);
        network.enter(1, 2).unwrap();
        assert!((network.travel_time(1, 2).value() - 4.01).abs() < 1e-12);
        assert!((network.free_flow_time(1, 2).value() - 4.0).abs() < 1e-12);
        assert!(is_unreachable(network.travel_time(3, 1)));
    }

    #[test]
    fn edges_lists_every_direction() {
        let mut network = line();
        network.enter(2, 1).unwrap();
        let mut edges: Vec<_> = network
            .edges()
            .map(|(from, to, e)| (from, to, e.occupancy()))
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(1, 2, 0), (2, 1, 1), (2, 3, 0)]);
        assert_eq!(network.total_occupancy(), 1);
    }

    #[test]
    fn clear_occupancy_zeroes_all_edges() {
        let mut network = line();
        network.enter(1, 2).unwrap();
        network.enter(2, 3).unwrap();
        network.enter(2, 3).unwrap();
        assert_eq!(network.total_occupancy(), 3);
        network.clear_occupancy();
        assert_eq!(network.total_occupancy(), 0);
    }
}
