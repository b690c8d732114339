//! Episode-level training driver.

use std::ops::ControlFlow;

use tracing::{debug, info, info_span, warn};

use super::config::RoutingConfig;
use super::environment::RoutingEnvironment;
use super::error::RoutingError;
use super::policy::{PolicyMode, RoutingPolicy};
use super::q_table::PolicyStore;
use super::types::{EpisodeOutcome, EpisodeReport};
use crate::Id;

/// Compact per-episode record kept in the training history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeStat {
    pub episode: usize,
    pub steps: u32,
    pub total_time: f64,
    pub max_delta: f64,
    pub outcome: EpisodeOutcome,
    pub stalled: usize,
}

impl From<&EpisodeReport> for EpisodeStat {
    fn from(report: &EpisodeReport) -> Self {
        Self {
            episode: report.episode,
            steps: report.steps,
            total_time: report.total_time,
            max_delta: report.max_delta,
            outcome: report.outcome,
            stalled: report.stalled().count(),
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub run_id: Id,
    pub policy: String,
    pub episodes_run: usize,
    /// Stopped because an episode's largest value change fell below the
    /// convergence threshold.
    pub converged_early: bool,
    /// Stopped by the caller between episodes.
    pub aborted: bool,
    /// Episodes that ran out of step budget.
    pub non_converged_episodes: usize,
    pub history: Vec<EpisodeStat>,
    /// Final episode with exploration and learning switched off.
    pub rollout: EpisodeReport,
    /// Learned values, when the policy keeps any.
    pub store: Option<PolicyStore>,
}

impl TrainingSummary {
    /// Sum of elapsed time across vehicles in the greedy rollout.
    pub fn total_time(&self) -> f64 {
        self.rollout.total_time
    }
}

/// Drives a policy through training episodes in an environment.
///
/// Aborting between episodes is always safe: every value update is applied
/// as a single write, so the store is consistent at any episode boundary.
pub struct Trainer {
    run_id: Id,
    env: RoutingEnvironment,
    policy: Box<dyn RoutingPolicy>,
    episodes: usize,
    convergence_threshold: Option<f64>,
}

impl Trainer {
    pub fn new(env: RoutingEnvironment, policy: Box<dyn RoutingPolicy>, config: &RoutingConfig) -> Self {
        Self {
            run_id: crate::generate_id(),
            env,
            policy,
            episodes: config.episodes,
            convergence_threshold: config.convergence_threshold,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn env(&self) -> &RoutingEnvironment {
        &self.env
    }

    pub fn policy(&self) -> &dyn RoutingPolicy {
        self.policy.as_ref()
    }

    /// Environment and policy together, e.g. for evaluation after training.
    pub fn parts_mut(&mut self) -> (&mut RoutingEnvironment, &mut dyn RoutingPolicy) {
        (&mut self.env, self.policy.as_mut())
    }

    /// Runs all configured episodes (or until convergence).
    pub fn train(&mut self) -> Result<TrainingSummary, RoutingError> {
        self.train_with(|_| ControlFlow::Continue(()))
    }

    /// Like [`train`](Self::train), calling `on_episode` after each episode.
    /// Returning `ControlFlow::Break` stops training before the next one.
    pub fn train_with<F>(&mut self, mut on_episode: F) -> Result<TrainingSummary, RoutingError>
    where
        F: FnMut(&EpisodeReport) -> ControlFlow<()>,
    {
        let span = info_span!("training", run_id = %self.run_id, policy = self.policy.name());
        let _guard = span.enter();
        info!(
            episodes = self.episodes,
            vehicles = self.env.n_vehicles(),
            "training started"
        );

        let mut history = Vec::with_capacity(self.episodes);
        let mut non_converged_episodes = 0;
        let mut converged_early = false;
        let mut aborted = false;

        self.policy.set_mode(PolicyMode::Train);
        for _ in 0..self.episodes {
            let report = self.env.run_episode(self.policy.as_mut())?;
            self.policy.end_episode();

            if report.is_non_convergent() {
                non_converged_episodes += 1;
                warn!(
                    episode = report.episode,
                    step_budget = self.env.step_budget(),
                    "episode exceeded step budget"
                );
            }
            debug!(
                episode = report.episode,
                steps = report.steps,
                total_time = report.total_time,
                max_delta = report.max_delta,
                "episode finished"
            );
            history.push(EpisodeStat::from(&report));

            if let Some(threshold) = self.convergence_threshold {
                if report.max_delta < threshold {
                    converged_early = true;
                    info!(episode = report.episode, max_delta = report.max_delta, "converged");
                    break;
                }
            }
            if on_episode(&report).is_break() {
                aborted = true;
                info!(episode = report.episode, "training aborted");
                break;
            }
        }

        self.policy.set_mode(PolicyMode::Exploit);
        let rollout = self.env.run_episode(self.policy.as_mut());
        self.policy.set_mode(PolicyMode::Train);
        let rollout = rollout?;

        let stalled = rollout.stalled().count();
        if stalled > 0 {
            warn!(stalled, "vehicles stalled in greedy rollout");
        }
        info!(
            episodes_run = history.len(),
            total_time = rollout.total_time,
            non_converged_episodes,
            "training finished"
        );

        Ok(TrainingSummary {
            run_id: self.run_id.clone(),
            policy: self.policy.name().to_string(),
            episodes_run: history.len(),
            converged_early,
            aborted,
            non_converged_episodes,
            history,
            rollout,
            store: self.policy.policy_store().cloned(),
        })
    }

    /// Runs one greedy episode without learning, e.g. after training.
    pub fn rollout(&mut self) -> Result<EpisodeReport, RoutingError> {
        self.policy.set_mode(PolicyMode::Exploit);
        let report = self.env.run_episode(self.policy.as_mut());
        self.policy.set_mode(PolicyMode::Train);
        report
    }
}
