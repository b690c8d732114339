//! Routing policy trait.

use super::super::q_table::PolicyStore;
use super::super::types::Transition;
use super::super::vehicle::Vehicle;
use super::super::error::RoutingError;
use crate::network::{NodeId, RoadNetwork};

/// Whether a policy is being trained or only exploited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyMode {
    /// Explore and learn from every observed move.
    #[default]
    Train,
    /// No exploration, no learning.
    Exploit,
}

/// Everything a policy sees when asked for a vehicle's next node.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub network: &'a RoadNetwork,
    pub vehicle: &'a Vehicle,
    /// Admissible next nodes, ascending. Never contains an absent edge.
    pub candidates: &'a [NodeId],
}

/// A strategy mapping a vehicle's decision context to its next node.
///
/// The scheduler calls, per vehicle move:
/// [`choose`](Self::choose) → enter edge → [`observe`](Self::observe) →
/// release previous edge → advance.
pub trait RoutingPolicy: Send + Sync {
    /// Picks the next node.
    ///
    /// # Errors
    ///
    /// `NoReachableAction` when nothing in `ctx.candidates` is usable; the
    /// scheduler marks the vehicle as stalled.
    fn choose(&mut self, ctx: &DecisionContext<'_>) -> Result<NodeId, RoutingError>;

    /// Learns from a completed move. Returns the absolute value change applied.
    fn observe(&mut self, _transition: &Transition) -> f64 {
        0.0
    }

    /// Called after the environment reset, before the first step.
    fn begin_episode(&mut self, _network: &RoadNetwork, _vehicles: &[Vehicle]) {}

    /// Called once a training episode has finished.
    fn end_episode(&mut self) {}

    fn set_mode(&mut self, _mode: PolicyMode) {}

    /// Learned values, for policies that keep them.
    fn policy_store(&self) -> Option<&PolicyStore> {
        None
    }

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
