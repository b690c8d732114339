//! Core value types shared by the routing environment and its policies.

use std::fmt;

use crate::network::NodeId;

/// Index of a vehicle in declaration order.
pub type VehicleId = usize;

/// Decision context of a vehicle: where it is and where it is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateKey {
    pub node: NodeId,
    pub destination: NodeId,
}

impl StateKey {
    pub fn new(node: NodeId, destination: NodeId) -> Self {
        Self { node, destination }
    }

    /// The composite key for taking `action` (next node) from this state.
    pub fn with_action(self, action: NodeId) -> QKey {
        QKey {
            node: self.node,
            destination: self.destination,
            action,
        }
    }
}

/// Flat composite key `(node, destination, action)` of the policy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QKey {
    pub node: NodeId,
    pub destination: NodeId,
    pub action: NodeId,
}

impl QKey {
    pub fn state(&self) -> StateKey {
        StateKey::new(self.node, self.destination)
    }
}

/// One observed move, handed to [`RoutingPolicy::observe`](super::policy::RoutingPolicy::observe).
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub vehicle: VehicleId,
    pub from: NodeId,
    pub to: NodeId,
    pub destination: NodeId,
    /// Negative travel time of the move.
    pub reward: f64,
    /// Actions admissible for this vehicle once it stands on `to`.
    pub next_candidates: Vec<NodeId>,
    /// `to` is the vehicle's destination.
    pub arrived: bool,
}

impl Transition {
    pub fn state(&self) -> StateKey {
        StateKey::new(self.from, self.destination)
    }

    pub fn next_state(&self) -> StateKey {
        StateKey::new(self.to, self.destination)
    }
}

/// How a vehicle's trip ended within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripOutcome {
    Arrived,
    /// No admissible action was left at `at`.
    Stalled { at: NodeId },
    /// The episode's step budget ran out first.
    InTransit,
}

/// Per-vehicle result of an episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSummary {
    pub vehicle: VehicleId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub path: Vec<NodeId>,
    pub elapsed_time: f64,
    pub outcome: TripOutcome,
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.outcome {
            TripOutcome::Arrived => "arrived".to_string(),
            TripOutcome::Stalled { at } => format!("stalled at {}", at),
            TripOutcome::InTransit => "in transit".to_string(),
        };
        write!(
            f,
            "Vehicle {} ({} -> {}) {} in {:.2}, path {:?}",
            self.vehicle, self.origin, self.destination, status, self.elapsed_time, self.path
        )
    }
}

/// How an episode as a whole ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EpisodeOutcome {
    /// Every vehicle arrived or stalled.
    Completed,
    /// The step budget was exhausted with vehicles still moving.
    NonConvergence { step_budget: u32 },
}

/// Result of one episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeReport {
    pub episode: usize,
    pub steps: u32,
    pub trips: Vec<TripSummary>,
    /// Sum of elapsed time across all vehicles.
    pub total_time: f64,
    /// Largest absolute policy-value change applied during the episode.
    pub max_delta: f64,
    pub outcome: EpisodeOutcome,
}

impl EpisodeReport {
    pub fn all_arrived(&self) -> bool {
        self.trips.iter().all(|t| t.outcome == TripOutcome::Arrived)
    }

    pub fn stalled(&self) -> impl Iterator<Item = &TripSummary> {
        self.trips
            .iter()
            .filter(|t| matches!(t.outcome, TripOutcome::Stalled { .. }))
    }

    pub fn is_non_convergent(&self) -> bool {
        matches!(self.outcome, EpisodeOutcome::NonConvergence { .. })
    }
}

impl fmt::Display for EpisodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for trip in &self.trips {
            writeln!(f, "{}", trip)?;
        }
        write!(f, "Total time taken for all vehicles: {:.2}", self.total_time)
    }
}
