//! Congestion-aware route learning.
//!
//! Vehicles move over a shared [`RoadNetwork`](crate::network::RoadNetwork)
//! whose edge costs grow with occupancy, so every vehicle's route changes
//! what the others experience. A [`RoutingPolicy`] chooses each move; the
//! [`LearnedPolicy`] learns from negative travel times with tabular
//! Q-learning over a [`PolicyStore`] shared by all vehicles.
//!
//! Scheduling is sequential per step: vehicles move one at a time in
//! declaration order, so no two updates of an edge or store entry overlap.
//! Independent runs can still go in parallel (see [`crate::sweep`]).

pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod q_table;
pub mod reward;
pub mod selector;
pub mod trainer;
pub mod types;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use config::{OccupancyMode, PolicyKind, RoutingConfig};
pub use environment::{RoutingEnvironment, StepResult};
pub use error::{ConfigError, RoutingError, SimulationError};
pub use metrics::EvaluationMetrics;
pub use policy::{
    build_policy, DecisionContext, ExhaustivePolicy, GreedyHeuristicPolicy, LearnedPolicy,
    PolicyMode, RoutingPolicy,
};
pub use q_table::PolicyStore;
pub use reward::RewardComputer;
pub use selector::ActionSelector;
pub use trainer::{EpisodeStat, Trainer, TrainingSummary};
pub use types::{
    EpisodeOutcome, EpisodeReport, QKey, StateKey, Transition, TripOutcome, TripSummary, VehicleId,
};
pub use vehicle::{Vehicle, VehicleStatus};
