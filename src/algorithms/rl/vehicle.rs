//! Vehicle trip state.

use super::types::{StateKey, TripOutcome, TripSummary, VehicleId};
use crate::network::{NodeId, RoadNetwork, VehicleDecl};

/// Where a vehicle is in its trip lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    EnRoute,
    /// Reached its destination; frozen for the rest of the episode.
    Arrived,
    /// Ran out of admissible actions; frozen for the rest of the episode.
    Stalled,
}

/// Mutable trip state of a single vehicle.
///
/// Holds only node identifiers into the [`RoadNetwork`], never edge state.
///
/// # Invariants
///
/// - `path[0] == origin` and `path.last() == Some(&current_position)`
/// - `path.len() == steps_taken() + 1`
/// - At most one edge is held at a time: the one last traversed
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub origin: NodeId,
    pub destination: NodeId,
    current_position: NodeId,
    elapsed_time: f64,
    path: Vec<NodeId>,
    held_edge: Option<(NodeId, NodeId)>,
    status: VehicleStatus,
}

impl Vehicle {
    pub fn new(id: VehicleId, decl: VehicleDecl) -> Self {
        let mut vehicle = Self {
            id,
            origin: decl.origin,
            destination: decl.destination,
            current_position: decl.origin,
            elapsed_time: 0.0,
            path: vec![decl.origin],
            held_edge: None,
            status: VehicleStatus::EnRoute,
        };
        vehicle.refresh_arrival();
        vehicle
    }

    /// Puts the vehicle back at its origin with a fresh trip.
    ///
    /// Returns the edge it was holding, which the caller must release.
    pub fn reset(&mut self) -> Option<(NodeId, NodeId)> {
        self.current_position = self.origin;
        self.elapsed_time = 0.0;
        self.path.clear();
        self.path.push(self.origin);
        self.status = VehicleStatus::EnRoute;
        self.refresh_arrival();
        self.held_edge.take()
    }

    fn refresh_arrival(&mut self) {
        if self.current_position == self.destination {
            self.status = VehicleStatus::Arrived;
        }
    }

    pub fn current_position(&self) -> NodeId {
        self.current_position
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn held_edge(&self) -> Option<(NodeId, NodeId)> {
        self.held_edge
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn state(&self) -> StateKey {
        StateKey::new(self.current_position, self.destination)
    }

    pub fn steps_taken(&self) -> usize {
        self.path.len() - 1
    }

    pub fn is_terminal(&self) -> bool {
        self.status != VehicleStatus::EnRoute
    }

    pub fn has_visited(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }

    /// Actions open to the vehicle from where it stands.
    ///
    /// With `acyclic`, nodes already on the path are excluded.
    pub fn admissible_actions(&self, network: &RoadNetwork, acyclic: bool) -> Vec<NodeId> {
        self.candidates_from(network, self.current_position, None, acyclic)
    }

    /// Actions that would be open after moving to `next`.
    pub fn admissible_after(&self, network: &RoadNetwork, next: NodeId, acyclic: bool) -> Vec<NodeId> {
        self.candidates_from(network, next, Some(next), acyclic)
    }

    fn candidates_from(
        &self,
        network: &RoadNetwork,
        node: NodeId,
        pending: Option<NodeId>,
        acyclic: bool,
    ) -> Vec<NodeId> {
        let mut out = network.neighbors(node);
        if acyclic {
            out.retain(|n| !self.has_visited(*n) && Some(*n) != pending);
        }
        out
    }

    /// Completes a move onto `next` that took `time`, now holding
    /// `current → next`. Returns the edge released by the move.
    pub(crate) fn advance(&mut self, next: NodeId, time: f64) -> Option<(NodeId, NodeId)> {
        let released = self.held_edge.replace((self.current_position, next));
        self.current_position = next;
        self.path.push(next);
        self.elapsed_time += time;
        self.refresh_arrival();
        released
    }

    /// Drops the held edge without moving; returns it for release.
    pub(crate) fn release_edge(&mut self) -> Option<(NodeId, NodeId)> {
        self.held_edge.take()
    }

    pub(crate) fn mark_stalled(&mut self) {
        self.status = VehicleStatus::Stalled;
    }

    pub fn summary(&self) -> TripSummary {
        let outcome = match self.status {
            VehicleStatus::Arrived => TripOutcome::Arrived,
            VehicleStatus::Stalled => TripOutcome::Stalled {
                at: self.current_position,
            },
            VehicleStatus::EnRoute => TripOutcome::InTransit,
        };
        TripSummary {
            vehicle: self.id,
            origin: self.origin,
            destination: self.destination,
            path: self.path.clone(),
            elapsed_time: self.elapsed_time,
            outcome,
        }
    }
}
