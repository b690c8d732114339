//! Configuration for route learning and simulation.

use super::error::ConfigError;
use crate::network::CongestionModel;

/// What happens to edge occupancy when an episode is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OccupancyMode {
    /// All counters are zeroed at reset.
    #[default]
    Episodic,
    /// Vehicles release the edges they hold; any other load stays.
    Continuous,
}

/// Which [`RoutingPolicy`](super::policy::RoutingPolicy) drives the vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyKind {
    /// ε-greedy Q-learning.
    #[default]
    Learned,
    /// Local search on immediate cost plus an id-distance estimate.
    GreedyHeuristic,
    /// Follows the exhaustive baseline's cheapest path.
    Exhaustive,
}

/// Configuration of a routing simulation.
///
/// Controls the Q-learning hyperparameters, episode scheduling, congestion
/// costs and policy selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    // --- Q-learning ---
    /// Learning rate α ∈ (0, 1].
    pub alpha: f64,
    /// Discount factor γ ∈ [0, 1].
    pub gamma: f64,
    /// Exploration probability ε ∈ [0, 1].
    pub epsilon: f64,
    /// Multiplier applied to ε after every training episode.
    pub epsilon_decay: f64,
    /// Floor for decayed ε.
    pub min_epsilon: f64,

    // --- Scheduling ---
    /// Number of training episodes.
    pub episodes: usize,
    /// Maximum number of steps per episode.
    pub step_budget: u32,
    /// Stop training early once an episode's largest value change falls
    /// below this threshold.
    pub convergence_threshold: Option<f64>,
    pub occupancy_mode: OccupancyMode,
    /// Forbid revisiting nodes already on the vehicle's path.
    pub acyclic: bool,
    /// Seed of the exploration RNG.
    pub seed: u64,

    // --- Network ---
    pub congestion: CongestionModel,

    pub policy: PolicyKind,
}

impl RoutingConfig {
    /// Checks every option against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::out_of_range("alpha", self.alpha, "(0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::out_of_range("gamma", self.gamma, "[0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::out_of_range("epsilon", self.epsilon, "[0, 1]"));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(ConfigError::out_of_range(
                "epsilon_decay",
                self.epsilon_decay,
                "(0, 1]",
            ));
        }
        if !(0.0..=self.epsilon).contains(&self.min_epsilon) {
            return Err(ConfigError::out_of_range(
                "min_epsilon",
                self.min_epsilon,
                "[0, epsilon]",
            ));
        }
        if self.episodes == 0 {
            return Err(ConfigError::out_of_range("episodes", 0.0, "positive integers"));
        }
        if self.step_budget == 0 {
            return Err(ConfigError::out_of_range("step_budget", 0.0, "positive integers"));
        }
        if let Some(threshold) = self.convergence_threshold {
            if !(threshold > 0.0) {
                return Err(ConfigError::out_of_range(
                    "convergence_threshold",
                    threshold,
                    "(0, inf)",
                ));
            }
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            episodes: 500,
            step_budget: 100,
            convergence_threshold: None,
            occupancy_mode: OccupancyMode::Episodic,
            acyclic: true,
            seed: 42,
            congestion: CongestionModel::default(),
            policy: PolicyKind::Learned,
        }
    }
}
