//! Evaluation metrics for routing policies.
//!
//! Runs a policy for several episodes and aggregates trip-level results.

use std::fmt;

use super::environment::RoutingEnvironment;
use super::error::RoutingError;
use super::policy::RoutingPolicy;
use super::types::TripOutcome;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    /// Mean summed elapsed time across vehicles per episode.
    pub mean_total_time: f64,
    /// Mean elapsed time of trips that arrived.
    pub mean_arrived_trip_time: f64,
    /// Percentage of trips that reached their destination.
    pub pct_arrived: f64,
    /// Mean number of stalled vehicles per episode.
    pub mean_stalled: f64,
    /// Mean number of vehicles still in transit when the budget ran out.
    pub mean_in_transit: f64,
    /// Mean number of steps per episode.
    pub mean_steps: f64,
    /// Episodes that exhausted their step budget.
    pub non_converged_episodes: usize,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

/// Tracks per-episode statistics during evaluation.
#[derive(Debug, Default)]
struct EpisodeStats {
    total_time: f64,
    arrived: u32,
    arrived_time: f64,
    stalled: u32,
    in_transit: u32,
    steps: u32,
    non_converged: bool,
}

impl EvaluationMetrics {
    /// Evaluates a policy over multiple episodes and returns aggregated metrics.
    ///
    /// The policy is used as-is; switch it to exploit mode beforehand to
    /// measure the greedy routes only.
    ///
    /// # Arguments
    ///
    /// * `env` - The routing environment to evaluate in
    /// * `policy` - The policy to evaluate
    /// * `n_episodes` - Number of episodes to run
    pub fn evaluate(
        env: &mut RoutingEnvironment,
        policy: &mut dyn RoutingPolicy,
        n_episodes: usize,
    ) -> Result<Self, RoutingError> {
        let mut all_stats = Vec::with_capacity(n_episodes);

        for _ in 0..n_episodes {
            let report = env.run_episode(policy)?;
            let mut stats = EpisodeStats {
                total_time: report.total_time,
                steps: report.steps,
                non_converged: report.is_non_convergent(),
                ..EpisodeStats::default()
            };
            for trip in &report.trips {
                match trip.outcome {
                    TripOutcome::Arrived => {
                        stats.arrived += 1;
                        stats.arrived_time += trip.elapsed_time;
                    }
                    TripOutcome::Stalled { .. } => stats.stalled += 1,
                    TripOutcome::InTransit => stats.in_transit += 1,
                }
            }
            all_stats.push(stats);
        }

        let n = all_stats.len().max(1) as f64;
        let mean = |f: fn(&EpisodeStats) -> f64| all_stats.iter().map(f).sum::<f64>() / n;

        let arrived: u32 = all_stats.iter().map(|s| s.arrived).sum();
        let trips = (all_stats.len() * env.n_vehicles()) as f64;

        Ok(Self {
            mean_total_time: mean(|s| s.total_time),
            mean_arrived_trip_time: if arrived > 0 {
                all_stats.iter().map(|s| s.arrived_time).sum::<f64>() / f64::from(arrived)
            } else {
                0.0
            },
            pct_arrived: if trips > 0.0 {
                f64::from(arrived) / trips * 100.0
            } else {
                0.0
            },
            mean_stalled: mean(|s| f64::from(s.stalled)),
            mean_in_transit: mean(|s| f64::from(s.in_transit)),
            mean_steps: mean(|s| f64::from(s.steps)),
            non_converged_episodes: all_stats.iter().filter(|s| s.non_converged).count(),
            n_episodes,
        })
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(f, "  Mean total time:         {:.2}", self.mean_total_time)?;
        writeln!(
            f,
            "  Mean arrived trip time:  {:.2}",
            self.mean_arrived_trip_time
        )?;
        writeln!(f, "  % arrived:               {:.1}%", self.pct_arrived)?;
        writeln!(f, "  Mean stalled:            {:.2}", self.mean_stalled)?;
        writeln!(f, "  Mean in transit:         {:.2}", self.mean_in_transit)?;
        writeln!(f, "  Mean steps:              {:.1}", self.mean_steps)?;
        writeln!(
            f,
            "  Budget exceeded:         {}",
            self.non_converged_episodes
        )
    }
}
