//! congestion_routing - congestion-aware route learning on road networks
//!
//! Vehicles travel a directed road graph whose edge costs grow with the
//! number of vehicles on them. A tabular Q-learning policy learns, per
//! `(node, destination)` state, which neighbor to move to next. An
//! exhaustive path enumerator provides the optimal baseline.

pub mod algorithms;
pub mod network;
pub mod simulation;
pub mod sweep;

pub use algorithms::rl::{
    EpisodeReport, PolicyKind, RoutingConfig, RoutingError, SimulationError, TrainingSummary,
};
pub use network::{CongestionModel, NodeId, RoadNetwork, Topology, VehicleDecl};
pub use simulation::Simulation;

/// Identifier type used for training runs.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
