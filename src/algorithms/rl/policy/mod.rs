//! Routing policies behind one [`RoutingPolicy`] capability.

pub mod exhaustive;
pub mod heuristic;
pub mod learned;
pub mod trait_;

pub use exhaustive::ExhaustivePolicy;
pub use heuristic::GreedyHeuristicPolicy;
pub use learned::LearnedPolicy;
pub use trait_::{DecisionContext, PolicyMode, RoutingPolicy};

use super::config::{PolicyKind, RoutingConfig};
use crate::algorithms::baseline::OccupancyView;

/// Builds the policy selected by `config.policy`.
pub fn build_policy(config: &RoutingConfig) -> Box<dyn RoutingPolicy> {
    match config.policy {
        PolicyKind::Learned => Box::new(LearnedPolicy::new(config)),
        PolicyKind::GreedyHeuristic => Box::new(GreedyHeuristicPolicy::new()),
        PolicyKind::Exhaustive => Box::new(ExhaustivePolicy::new(OccupancyView::Current)),
    }
}
