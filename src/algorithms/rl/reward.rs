//! Reward for a single move.
//!
//! The reward is the *negative* travel time of the edge just entered,
//! measured at post-entry occupancy. Maximising cumulative reward therefore
//! minimises cumulative travel time.

use crate::network::cost::is_unreachable;
use crate::network::{NodeId, RoadNetwork, TravelTime};

/// Computes rewards for the routing environment.
pub struct RewardComputer;

impl RewardComputer {
    /// `-travel_time`, or `None` for the unreachable cost.
    pub fn from_travel_time(time: TravelTime) -> Option<f64> {
        if is_unreachable(time) {
            None
        } else {
            Some(-time.value())
        }
    }

    /// Reward for traversing `from → to` at the network's current occupancy.
    pub fn for_move(network: &RoadNetwork, from: NodeId, to: NodeId) -> Option<f64> {
        Self::from_travel_time(network.travel_time(from, to))
    }
}
