//! Hyperparameter sweeps over independent simulation runs.
//!
//! Every configuration gets its own [`Simulation`], so runs share no state.
//! With the `parallel` feature they are spread over the rayon pool.

use crate::algorithms::rl::{RoutingConfig, SimulationError, TrainingSummary};
use crate::network::{Topology, VehicleDecl};
use crate::simulation::Simulation;

/// Result of one configuration in a sweep.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub config: RoutingConfig,
    pub outcome: Result<TrainingSummary, SimulationError>,
}

impl SweepResult {
    /// Rollout total time when every vehicle arrived.
    pub fn total_time(&self) -> Option<f64> {
        match &self.outcome {
            Ok(summary) if summary.rollout.all_arrived() => Some(summary.total_time()),
            _ => None,
        }
    }
}

fn run_one(topology: &Topology, vehicles: &[VehicleDecl], config: &RoutingConfig) -> SweepResult {
    let outcome = Simulation::new(topology, vehicles, config.clone()).and_then(|mut sim| sim.run());
    SweepResult {
        config: config.clone(),
        outcome,
    }
}

/// Runs every configuration against the same topology and fleet, returning
/// results in input order.
pub fn run_sweep(
    topology: &Topology,
    vehicles: &[VehicleDecl],
    configs: &[RoutingConfig],
) -> Vec<SweepResult> {
    #[cfg(not(feature = "parallel"))]
    {
        configs
            .iter()
            .map(|config| run_one(topology, vehicles, config))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        configs
            .par_iter()
            .map(|config| run_one(topology, vehicles, config))
            .collect()
    }
}

/// Index of the result with the lowest fully-arrived rollout time.
pub fn best(results: &[SweepResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.total_time().map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
