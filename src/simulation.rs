//! One self-contained simulation run: network, vehicles, policy, trainer.

use crate::algorithms::baseline::{BaselineEvaluator, BaselineReport, OccupancyView};
use crate::algorithms::rl::{
    build_policy, RoutingConfig, RoutingEnvironment, SimulationError, Trainer, TrainingSummary,
};
use crate::network::{RoadNetwork, Topology, VehicleDecl};

/// Builds every component of a run from plain declarations.
///
/// Each simulation owns its network and policy store, so any number of
/// them can run independently.
///
/// # Example
///
/// ```ignore
/// let topology = Topology::ring(&[1, 2, 3, 4, 5, 6], &[1, 3, 6]);
/// let mut sim = Simulation::new(&topology, &[VehicleDecl::new(1, 5)], RoutingConfig::default())?;
/// let summary = sim.run()?;
/// println!("{}", summary.rollout);
/// ```
pub struct Simulation {
    config: RoutingConfig,
    trainer: Trainer,
}

impl Simulation {
    /// # Errors
    ///
    /// - `Config` if a hyperparameter is out of range
    /// - `Network` (`InvalidTopology`, `DuplicateNode`) if the topology is malformed
    /// - `Routing` (`UnknownVehicleNode`) if a vehicle references an unknown node
    pub fn new(
        topology: &Topology,
        vehicles: &[VehicleDecl],
        config: RoutingConfig,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let network = RoadNetwork::from_topology(topology, config.congestion)?;
        let env = RoutingEnvironment::new(network, vehicles, &config)?;
        let trainer = Trainer::new(env, build_policy(&config), &config);
        Ok(Self { config, trainer })
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    pub fn trainer_mut(&mut self) -> &mut Trainer {
        &mut self.trainer
    }

    /// Trains for the configured episodes, then reports the greedy rollout.
    pub fn run(&mut self) -> Result<TrainingSummary, SimulationError> {
        Ok(self.trainer.train()?)
    }

    /// Free-flow baseline for each vehicle, in declaration order.
    pub fn baseline(&self) -> Vec<BaselineReport> {
        let evaluator = BaselineEvaluator::new(OccupancyView::Zero);
        let env = self.trainer.env();
        env.vehicles()
            .iter()
            .map(|v| evaluator.evaluate(env.network(), v.origin, v.destination))
            .collect()
    }
}
