//! Routing environment and step scheduler.
//!
//! Each step processes the non-terminal vehicles one at a time, in
//! declaration order:
//! select → enter next edge → reward at post-entry occupancy → policy update
//! → release previous edge → advance position, path and elapsed time.
//!
//! A vehicle that arrives or stalls keeps its last edge until every vehicle
//! has moved, so later vehicles in the same step still pay for it.

use tracing::{debug, trace};

use super::config::{OccupancyMode, RoutingConfig};
use super::error::RoutingError;
use super::policy::{DecisionContext, RoutingPolicy};
use super::reward::RewardComputer;
use super::types::{EpisodeOutcome, EpisodeReport, Transition, TripSummary, VehicleId};
use super::vehicle::Vehicle;
use crate::network::{NetworkError, NodeId, RoadNetwork, VehicleDecl};

/// Result of a single environment step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    /// Step counter after this step.
    pub time_step: u32,
    /// Number of vehicles that moved.
    pub moves: usize,
    /// Vehicles that reached their destination during this step.
    pub arrived: Vec<VehicleId>,
    /// Vehicles that stalled during this step, with the node they stalled at.
    pub stalled: Vec<(VehicleId, NodeId)>,
    /// Largest absolute policy-value change applied.
    pub max_delta: f64,
    /// Every vehicle is terminal.
    pub done: bool,
}

/// The multi-vehicle routing environment.
///
/// Owns its [`RoadNetwork`] and vehicles; several environments can run side
/// by side without sharing anything.
///
/// # Lifecycle
///
/// 1. Build with [`RoutingEnvironment::new`].
/// 2. Call [`reset`](Self::reset) to start an episode.
/// 3. Call [`step`](Self::step) until `done` or the step budget is spent,
///    or let [`run_episode`](Self::run_episode) do both.
#[derive(Debug, Clone)]
pub struct RoutingEnvironment {
    network: RoadNetwork,
    vehicles: Vec<Vehicle>,
    occupancy_mode: OccupancyMode,
    acyclic: bool,
    step_budget: u32,
    /// Current time step.
    pub t: u32,
    episodes: usize,
}

impl RoutingEnvironment {
    /// # Errors
    ///
    /// `UnknownVehicleNode` if a vehicle's origin or destination is not in
    /// the network.
    pub fn new(
        network: RoadNetwork,
        vehicles: &[VehicleDecl],
        config: &RoutingConfig,
    ) -> Result<Self, RoutingError> {
        let mut fleet = Vec::with_capacity(vehicles.len());
        for (id, decl) in vehicles.iter().enumerate() {
            for node in [decl.origin, decl.destination] {
                if !network.contains_node(node) {
                    return Err(RoutingError::UnknownVehicleNode { vehicle: id, node });
                }
            }
            fleet.push(Vehicle::new(id, *decl));
        }
        Ok(Self {
            network,
            vehicles: fleet,
            occupancy_mode: config.occupancy_mode,
            acyclic: config.acyclic,
            step_budget: config.step_budget,
            t: 0,
            episodes: 0,
        })
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Mutable access, e.g. to seed background occupancy in continuous mode.
    pub fn network_mut(&mut self) -> &mut RoadNetwork {
        &mut self.network
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn n_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn step_budget(&self) -> u32 {
        self.step_budget
    }

    /// Number of episodes started so far.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn all_terminal(&self) -> bool {
        self.vehicles.iter().all(Vehicle::is_terminal)
    }

    /// Sum of elapsed time across all vehicles.
    pub fn total_time(&self) -> f64 {
        self.vehicles.iter().map(Vehicle::elapsed_time).sum()
    }

    pub fn trips(&self) -> Vec<TripSummary> {
        self.vehicles.iter().map(Vehicle::summary).collect()
    }

    /// Starts a new episode: every vehicle back at its origin with no time
    /// and a one-node path.
    ///
    /// Held edges are always released. In [`OccupancyMode::Episodic`] every
    /// counter is then zeroed as well.
    pub fn reset(&mut self) -> Result<(), RoutingError> {
        let mut released = Vec::new();
        for vehicle in &mut self.vehicles {
            released.extend(vehicle.reset());
        }
        match self.occupancy_mode {
            OccupancyMode::Episodic => self.network.clear_occupancy(),
            OccupancyMode::Continuous => {
                for (from, to) in released {
                    self.network.exit(from, to)?;
                }
            }
        }
        self.t = 0;
        self.episodes += 1;
        Ok(())
    }

    /// Executes one step for every non-terminal vehicle.
    ///
    /// A vehicle whose policy reports `NoReachableAction` is marked stalled
    /// and the step continues with the next vehicle. Vehicles that arrived or
    /// stalled release their held edge once the whole step is done.
    ///
    /// # Errors
    ///
    /// Any other policy error, or a network error from an inconsistent move.
    /// Occupancy is left balanced either way.
    pub fn step(&mut self, policy: &mut dyn RoutingPolicy) -> Result<StepResult, RoutingError> {
        let mut result = StepResult::default();

        for index in 0..self.vehicles.len() {
            if self.vehicles[index].is_terminal() {
                continue;
            }

            let vehicle = &self.vehicles[index];
            let from = vehicle.current_position();
            let candidates = vehicle.admissible_actions(&self.network, self.acyclic);
            let choice = policy.choose(&DecisionContext {
                network: &self.network,
                vehicle,
                candidates: &candidates,
            });

            let next = match choice {
                Ok(next) => next,
                Err(RoutingError::NoReachableAction { node, destination }) => {
                    debug!(vehicle = index, node, destination, "vehicle stalled");
                    self.vehicles[index].mark_stalled();
                    result.stalled.push((index, node));
                    continue;
                }
                Err(e) => return Err(e),
            };

            let delta = self.apply_move(index, from, next, policy)?;
            result.moves += 1;
            result.max_delta = result.max_delta.max(delta);
            if self.vehicles[index].is_terminal() {
                result.arrived.push(index);
            }
        }

        for &index in result
            .arrived
            .iter()
            .chain(result.stalled.iter().map(|(index, _)| index))
        {
            self.release_held(index)?;
        }

        self.t += 1;
        result.time_step = self.t;
        result.done = self.all_terminal();
        Ok(result)
    }

    fn apply_move(
        &mut self,
        index: usize,
        from: NodeId,
        next: NodeId,
        policy: &mut dyn RoutingPolicy,
    ) -> Result<f64, RoutingError> {
        let occupancy = self.network.enter(from, next)?;
        let time = self.network.travel_time(from, next);
        let Some(reward) = RewardComputer::from_travel_time(time) else {
            self.network.exit(from, next)?;
            return Err(NetworkError::NoSuchEdge { from, to: next }.into());
        };

        let vehicle = &self.vehicles[index];
        let arrived = next == vehicle.destination;
        let next_candidates = if arrived {
            Vec::new()
        } else {
            vehicle.admissible_after(&self.network, next, self.acyclic)
        };
        let delta = policy.observe(&Transition {
            vehicle: index,
            from,
            to: next,
            destination: vehicle.destination,
            reward,
            next_candidates,
            arrived,
        });

        if let Some((a, b)) = self.vehicles[index].held_edge() {
            if let Err(e) = self.network.exit(a, b) {
                self.network.exit(from, next)?;
                return Err(e.into());
            }
        }
        self.vehicles[index].advance(next, time.value());
        trace!(vehicle = index, from, to = next, occupancy, time = time.value(), "move");
        Ok(delta)
    }

    fn release_held(&mut self, index: usize) -> Result<(), RoutingError> {
        if let Some((a, b)) = self.vehicles[index].release_edge() {
            self.network.exit(a, b)?;
        }
        Ok(())
    }

    /// Runs a full episode: reset, then step until every vehicle is terminal
    /// or the step budget is exhausted.
    ///
    /// Running out of budget is reported as
    /// [`EpisodeOutcome::NonConvergence`], not as an error.
    pub fn run_episode(&mut self, policy: &mut dyn RoutingPolicy) -> Result<EpisodeReport, RoutingError> {
        self.reset()?;
        policy.begin_episode(&self.network, &self.vehicles);

        let mut max_delta: f64 = 0.0;
        while !self.all_terminal() && self.t < self.step_budget {
            let step = self.step(policy)?;
            max_delta = max_delta.max(step.max_delta);
        }

        let outcome = if self.all_terminal() {
            EpisodeOutcome::Completed
        } else {
            EpisodeOutcome::NonConvergence {
                step_budget: self.step_budget,
            }
        };

        Ok(EpisodeReport {
            episode: self.episodes,
            steps: self.t,
            trips: self.trips(),
            total_time: self.total_time(),
            max_delta,
            outcome,
        })
    }
}
