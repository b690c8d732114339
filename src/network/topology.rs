//! Plain declarations consumed when loading a network.

use super::NodeId;

/// A node declaration: `{id, is_intersection}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeDecl {
    pub id: NodeId,
    pub is_intersection: bool,
}

/// An edge declaration: `{from, to, directed}`.
///
/// Undirected declarations become two independent directed edges with the
/// same base time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeDecl {
    pub from: NodeId,
    pub to: NodeId,
    pub directed: bool,
    pub base_time: f64,
}

impl EdgeDecl {
    /// A normal road segment (base time 1).
    pub fn new(from: NodeId, to: NodeId, directed: bool) -> Self {
        Self {
            from,
            to,
            directed,
            base_time: 1.0,
        }
    }
}

/// A vehicle declaration: `{origin, destination}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleDecl {
    pub origin: NodeId,
    pub destination: NodeId,
}

impl VehicleDecl {
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// Ordered node and edge declarations for one network.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    pub nodes: Vec<NodeDecl>,
    pub edges: Vec<EdgeDecl>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: NodeId, is_intersection: bool) -> Self {
        self.nodes.push(NodeDecl {
            id,
            is_intersection,
        });
        self
    }

    pub fn edge(mut self, from: NodeId, to: NodeId, directed: bool) -> Self {
        self.edges.push(EdgeDecl::new(from, to, directed));
        self
    }

    /// Undirected ring over `ids` in order, closing back to the first id.
    pub fn ring(ids: &[NodeId], intersections: &[NodeId]) -> Self {
        Self::ring_with(ids, intersections, false)
    }

    /// One-way ring: `ids[0] -> ids[1] -> ... -> ids[0]`.
    pub fn directed_ring(ids: &[NodeId], intersections: &[NodeId]) -> Self {
        Self::ring_with(ids, intersections, true)
    }

    fn ring_with(ids: &[NodeId], intersections: &[NodeId], directed: bool) -> Self {
        let mut topology = Self::new();
        for &id in ids {
            topology = topology.node(id, intersections.contains(&id));
        }
        for (i, &from) in ids.iter().enumerate() {
            let to = ids[(i + 1) % ids.len()];
            if from != to {
                topology = topology.edge(from, to, directed);
            }
        }
        topology
    }
}
