//! Congestion cost function.
//!
//! ```text
//! travel_time(e, v) = base_time(e) + coefficient × occupancy(e) + delay(v)
//! delay(v)          = intersection_delay if v is an intersection, else 0
//! ```
//!
//! Callers pass the *post-entry* occupancy: the entering vehicle contributes
//! to the congestion it experiences.

use qtty::{Quantity, Second};

use super::edge::Edge;
use super::node::Node;

/// Traversal time of a single edge.
pub type TravelTime = Quantity<Second>;

/// Cost reported when two nodes are not connected. Consumers treat it as
/// +infinity and never turn it into a finite reward.
pub const UNREACHABLE: TravelTime = Quantity::new(f64::INFINITY);

/// Returns `true` for the distinguished unreachable cost.
pub fn is_unreachable(time: TravelTime) -> bool {
    !time.value().is_finite()
}

/// Parameters of the congestion cost function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CongestionModel {
    /// Extra time per vehicle already on the edge.
    pub coefficient: f64,
    /// Fixed delay for entering an intersection node.
    pub intersection_delay: f64,
    /// When `false`, occupancy is read as 0 (free-flow costs).
    pub enabled: bool,
}

impl CongestionModel {
    pub const DEFAULT_COEFFICIENT: f64 = 0.01;
    pub const DEFAULT_INTERSECTION_DELAY: f64 = 3.0;

    /// Free-flow model: keeps intersection delays, ignores occupancy.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Travel time over `edge` into `arrival`, using the edge's current
    /// occupancy.
    pub fn travel_time(&self, edge: &Edge, arrival: &Node) -> TravelTime {
        Quantity::new(self.cost_with_occupancy(edge.base_time(), edge.occupancy(), arrival))
    }

    /// Travel time over `edge` as if `occupancy` vehicles were on it.
    pub fn travel_time_at(&self, edge: &Edge, occupancy: u32, arrival: &Node) -> TravelTime {
        Quantity::new(self.cost_with_occupancy(edge.base_time(), occupancy, arrival))
    }

    fn cost_with_occupancy(&self, base_time: f64, occupancy: u32, arrival: &Node) -> f64 {
        let congestion = if self.enabled {
            self.coefficient * occupancy as f64
        } else {
            0.0
        };
        let delay = if arrival.is_intersection {
            self.intersection_delay
        } else {
            0.0
        };
        base_time + congestion + delay
    }
}

impl Default for CongestionModel {
    fn default() -> Self {
        Self {
            coefficient: Self::DEFAULT_COEFFICIENT,
            intersection_delay: Self::DEFAULT_INTERSECTION_DELAY,
            enabled: true,
        }
    }
}
