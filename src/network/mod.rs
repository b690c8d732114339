//! Road network model: static topology plus per-edge occupancy.
//!
//! Nodes and edges are registered once at load time. The only state that
//! changes while a simulation runs is each directed edge's occupancy counter,
//! mutated through [`RoadNetwork::enter`] and [`RoadNetwork::exit`].

pub mod cost;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod topology;

pub use cost::{CongestionModel, TravelTime};
pub use edge::Edge;
pub use error::NetworkError;
pub use graph::RoadNetwork;
pub use node::Node;
pub use topology::{EdgeDecl, NodeDecl, Topology, VehicleDecl};

/// Identifier of a road network node.
pub type NodeId = u32;
