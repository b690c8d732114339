//! Greedy local-search policy (non-learning baseline).
//!
//! Scores each admissible next node by:
//! ```text
//! score(c) = travel_time(current → c) + |c − destination|
//! ```
//! and moves to the lowest score. The second term uses node-id distance as
//! a cheap estimate of the remaining trip, which suits networks whose ids
//! are laid out along the roads.

use super::super::error::RoutingError;
use super::trait_::{DecisionContext, RoutingPolicy};
use crate::network::NodeId;

/// Greedy heuristic policy. Ties go to the lowest node id.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyHeuristicPolicy;

impl GreedyHeuristicPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Id-distance estimate of the remaining cost from `node`.
    pub fn estimate(node: NodeId, destination: NodeId) -> f64 {
        f64::from(node.abs_diff(destination))
    }
}

impl RoutingPolicy for GreedyHeuristicPolicy {
    fn choose(&mut self, ctx: &DecisionContext<'_>) -> Result<NodeId, RoutingError> {
        let here = ctx.vehicle.current_position();
        let destination = ctx.vehicle.destination;

        let mut best: Option<(NodeId, f64)> = None;
        for &candidate in ctx.candidates {
            let time = ctx.network.travel_time(here, candidate).value();
            if !time.is_finite() {
                continue;
            }
            let score = time + Self::estimate(candidate, destination);
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((candidate, score));
            }
        }

        best.map(|(n, _)| n).ok_or(RoutingError::NoReachableAction {
            node: here,
            destination,
        })
    }

    fn name(&self) -> &str {
        "greedy_heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::vehicle::Vehicle;
    use crate::network::{CongestionModel, RoadNetwork, Topology, VehicleDecl};

    fn ring() -> RoadNetwork {
        let topology = Topology::ring(&[1, 2, 3, 4, 5, 6], &[1, 3, 6]);
        RoadNetwork::from_topology(&topology, CongestionModel::default()).unwrap()
    }

    #[test]
    fn heuristic_heads_towards_closer_id() {
        let network = ring();
        let vehicle = Vehicle::new(0, VehicleDecl::new(4, 6));
        let candidates = vehicle.admissible_actions(&network, true);
        let ctx = DecisionContext {
            network: &network,
            vehicle: &vehicle,
            candidates: &candidates,
        };
        // 3: 4 + 3 = 7, 5: 1 + 1 = 2
        assert_eq!(GreedyHeuristicPolicy::new().choose(&ctx), Ok(5));
    }

    #[test]
    fn heuristic_weighs_intersection_delay() {
        let network = ring();
        let vehicle = Vehicle::new(0, VehicleDecl::new(1, 5));
        let candidates = vehicle.admissible_actions(&network, true);
        let ctx = DecisionContext {
            network: &network,
            vehicle: &vehicle,
            candidates: &candidates,
        };
        // 2: 1 + 3 = 4, 6: 4 + 1 = 5
        assert_eq!(GreedyHeuristicPolicy::new().choose(&ctx), Ok(2));
    }

    #[test]
    fn no_candidates_is_no_reachable_action() {
        let network = ring();
        let vehicle = Vehicle::new(0, VehicleDecl::new(1, 5));
        let ctx = DecisionContext {
            network: &network,
            vehicle: &vehicle,
            candidates: &[],
        };
        assert_eq!(
            GreedyHeuristicPolicy::new().choose(&ctx),
            Err(RoutingError::NoReachableAction {
                node: 1,
                destination: 5
            })
        );
    }
}
