// Demonstration: learn routes on a six-node ring and compare against the
// exhaustive baseline.
//
//   cargo run --example ring_demo -- --policy learned --episodes 500 --seed 42
//
// Set RUST_LOG=congestion_routing=debug for per-episode logs.

use std::env;

use congestion_routing::algorithms::rl::{EvaluationMetrics, PolicyMode};
use congestion_routing::{PolicyKind, RoutingConfig, Simulation, Topology, VehicleDecl};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let policy = match arg_value(&args, "--policy").unwrap_or("learned") {
        "learned" => PolicyKind::Learned,
        "greedy" => PolicyKind::GreedyHeuristic,
        "exhaustive" => PolicyKind::Exhaustive,
        other => {
            eprintln!(
                "Unknown --policy '{}'; expected 'learned', 'greedy' or 'exhaustive'.",
                other
            );
            std::process::exit(2);
        }
    };
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(500);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = RoutingConfig {
        policy,
        episodes,
        seed,
        ..RoutingConfig::default()
    };
    let topology = Topology::ring(&[1, 2, 3, 4, 5, 6], &[1, 3, 6]);
    let vehicles = [
        VehicleDecl::new(1, 5),
        VehicleDecl::new(2, 4),
        VehicleDecl::new(5, 1),
    ];

    let mut sim = match Simulation::new(&topology, &vehicles, config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for report in sim.baseline() {
        println!("{}", report);
    }

    let summary = match sim.run() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    println!("Policy: {} ({} episodes)", summary.policy, summary.episodes_run);
    println!("{}", summary.rollout);

    let (env, policy) = sim.trainer_mut().parts_mut();
    policy.set_mode(PolicyMode::Exploit);
    match EvaluationMetrics::evaluate(env, policy, 10) {
        Ok(metrics) => println!("{}", metrics),
        Err(e) => eprintln!("{}", e),
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
