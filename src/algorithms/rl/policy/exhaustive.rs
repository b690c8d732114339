//! Policy that follows the exhaustive baseline's cheapest path.

use std::collections::{HashMap, VecDeque};

use super::super::error::RoutingError;
use super::super::types::VehicleId;
use super::super::vehicle::Vehicle;
use super::trait_::{DecisionContext, RoutingPolicy};
use crate::algorithms::baseline::{BaselineEvaluator, OccupancyView};
use crate::network::{NodeId, RoadNetwork};

/// Plans each vehicle's whole route once per episode by enumerating all
/// simple paths, then replays it hop by hop.
///
/// Exponential planning cost; intended for small networks and as a
/// reference for the learned policy.
#[derive(Debug, Clone, Default)]
pub struct ExhaustivePolicy {
    evaluator: BaselineEvaluator,
    plans: HashMap<VehicleId, VecDeque<NodeId>>,
}

impl ExhaustivePolicy {
    pub fn new(occupancy: OccupancyView) -> Self {
        Self {
            evaluator: BaselineEvaluator::new(occupancy),
            plans: HashMap::new(),
        }
    }

    fn plan(&self, network: &RoadNetwork, vehicle: &Vehicle) -> Option<VecDeque<NodeId>> {
        let report = self
            .evaluator
            .evaluate(network, vehicle.current_position(), vehicle.destination);
        report
            .best_path()
            .map(|path| path.iter().skip(1).copied().collect())
    }
}

impl RoutingPolicy for ExhaustivePolicy {
    fn choose(&mut self, ctx: &DecisionContext<'_>) -> Result<NodeId, RoutingError> {
        let vehicle = ctx.vehicle;
        let stuck = RoutingError::NoReachableAction {
            node: vehicle.current_position(),
            destination: vehicle.destination,
        };

        if !self.plans.contains_key(&vehicle.id) {
            let plan = self.plan(ctx.network, vehicle).ok_or(stuck.clone())?;
            self.plans.insert(vehicle.id, plan);
        }

        let next = self
            .plans
            .get_mut(&vehicle.id)
            .and_then(VecDeque::pop_front)
            .ok_or(stuck.clone())?;
        if ctx.candidates.contains(&next) {
            Ok(next)
        } else {
            self.plans.remove(&vehicle.id);
            Err(stuck)
        }
    }

    fn begin_episode(&mut self, _network: &RoadNetwork, _vehicles: &[Vehicle]) {
        self.plans.clear();
    }

    fn name(&self) -> &str {
        "exhaustive"
    }
}
