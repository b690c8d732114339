//! End-to-end routing scenarios on small networks.

use super::*;
use crate::algorithms::baseline::{BaselineEvaluator, OccupancyView};
use crate::network::{CongestionModel, NodeId, RoadNetwork, Topology, VehicleDecl};

const RING: [NodeId; 6] = [1, 2, 3, 4, 5, 6];
const RING_INTERSECTIONS: [NodeId; 3] = [1, 3, 6];

fn ring_topology() -> Topology {
    Topology::ring(&RING, &RING_INTERSECTIONS)
}

fn env_for(topology: &Topology, vehicles: &[VehicleDecl], config: &RoutingConfig) -> RoutingEnvironment {
    let network = RoadNetwork::from_topology(topology, config.congestion).unwrap();
    RoutingEnvironment::new(network, vehicles, config).unwrap()
}

fn learning_config(seed: u64) -> RoutingConfig {
    RoutingConfig {
        alpha: 0.5,
        gamma: 0.9,
        epsilon: 0.1,
        episodes: 300,
        seed,
        congestion: CongestionModel::disabled(),
        ..RoutingConfig::default()
    }
}

mod shortest_route {
    use super::*;

    #[test]
    fn learned_rollout_matches_baseline_on_ring() {
        let topology = ring_topology();
        let config = learning_config(42);
        let env = env_for(&topology, &[VehicleDecl::new(1, 5)], &config);

        let baseline = BaselineEvaluator::new(OccupancyView::Zero).evaluate(env.network(), 1, 5);
        assert_eq!(baseline.best_path(), Some(&[1, 6, 5][..]));
        assert!((baseline.best_cost() - 5.0).abs() < 1e-12);

        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let summary = trainer.train().unwrap();

        assert!(summary.rollout.all_arrived());
        assert_eq!(summary.rollout.trips[0].path, vec![1, 6, 5]);
        assert!(baseline.within(summary.total_time(), 1e-9));
    }

    #[test]
    fn learned_values_rank_the_cheaper_first_hop() {
        let topology = ring_topology();
        let config = learning_config(7);
        let env = env_for(&topology, &[VehicleDecl::new(1, 5)], &config);
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let store = trainer.train().unwrap().store.unwrap();

        let state = StateKey::new(1, 5);
        assert_eq!(store.best_action(state, &[2, 6]), Some(6));
        assert!(store.value(state, 6) > store.value(state, 2));
    }

    #[test]
    fn converges_for_several_seeds() {
        let topology = ring_topology();
        for seed in 1..=5 {
            let config = learning_config(seed);
            let env = env_for(&topology, &[VehicleDecl::new(1, 5)], &config);
            let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
            let summary = trainer.train().unwrap();
            assert!(
                (summary.total_time() - 5.0).abs() < 1e-9,
                "seed {seed}: rollout took {}",
                summary.total_time()
            );
        }
    }

    #[test]
    fn reverse_trip_finds_its_own_optimum() {
        let topology = ring_topology();
        let config = learning_config(3);
        let env = env_for(&topology, &[VehicleDecl::new(5, 1)], &config);
        let baseline = BaselineEvaluator::new(OccupancyView::Zero).evaluate(env.network(), 5, 1);
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let summary = trainer.train().unwrap();

        assert!((baseline.best_cost() - 8.0).abs() < 1e-12);
        assert!(baseline.within(summary.total_time(), 1e-9));
    }

    #[test]
    fn greedy_cost_never_increases_as_exploration_decays() {
        let topology = ring_topology();
        let seeds = 1..=8u64;
        let n_seeds = seeds.clone().count() as f64;
        let mut mean = vec![0.0; 8];

        for seed in seeds {
            let config = RoutingConfig {
                epsilon: 1.0,
                epsilon_decay: 0.8,
                episodes: 10,
                ..learning_config(seed)
            };
            let env = env_for(&topology, &[VehicleDecl::new(1, 5)], &config);
            let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
            // each call trains ten more episodes, then rolls out greedily
            for checkpoint in mean.iter_mut() {
                *checkpoint += trainer.train().unwrap().total_time() / n_seeds;
            }
        }

        for pair in mean.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "greedy cost went up: {mean:?}");
        }
        assert!((mean[mean.len() - 1] - 5.0).abs() < 1e-9, "{mean:?}");
    }

    #[test]
    fn one_way_ring_has_a_single_route() {
        let topology = Topology::directed_ring(&RING, &RING_INTERSECTIONS);
        let config = learning_config(11);
        let env = env_for(&topology, &[VehicleDecl::new(1, 5)], &config);

        let baseline = BaselineEvaluator::new(OccupancyView::Zero).evaluate(env.network(), 1, 5);
        assert_eq!(baseline.paths.len(), 1);
        assert!((baseline.best_cost() - 7.0).abs() < 1e-12);

        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let summary = trainer.train().unwrap();
        assert_eq!(summary.rollout.trips[0].path, vec![1, 2, 3, 4, 5]);
        assert!(baseline.within(summary.total_time(), 1e-9));
    }

    #[test]
    fn learned_values_never_positive() {
        let topology = ring_topology();
        let config = RoutingConfig {
            episodes: 50,
            ..RoutingConfig::default()
        };
        let env = env_for(
            &topology,
            &[VehicleDecl::new(1, 5), VehicleDecl::new(4, 1)],
            &config,
        );
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let store = trainer.train().unwrap().store.unwrap();
        assert!(!store.is_empty());
        assert!(store.snapshot().iter().all(|(_, v)| *v <= 0.0));
    }
}

mod shared_edge {
    use super::*;

    #[test]
    fn second_vehicle_pays_for_the_first() {
        let config = RoutingConfig::default();
        let mut env = env_for(
            &ring_topology(),
            &[VehicleDecl::new(1, 3), VehicleDecl::new(1, 3)],
            &config,
        );
        let mut policy = GreedyHeuristicPolicy::new();
        env.reset().unwrap();

        env.step(&mut policy).unwrap();
        assert_eq!(env.network().occupancy(1, 2), Some(2));
        assert!((env.network().travel_time(1, 2).value() - 1.02).abs() < 1e-12);
        assert!((env.vehicles()[0].elapsed_time() - 1.01).abs() < 1e-12);
        assert!((env.vehicles()[1].elapsed_time() - 1.02).abs() < 1e-12);

        // 2 -> 3 enters an intersection: 4.01 for the first, 4.02 for the second
        let last = env.step(&mut policy).unwrap();
        assert!(last.done);
        assert_eq!(env.network().total_occupancy(), 0);
        assert!((env.total_time() - 10.06).abs() < 1e-9);
    }

    #[test]
    fn shared_last_hop_still_couples() {
        let config = RoutingConfig::default();
        let mut env = env_for(
            &ring_topology(),
            &[VehicleDecl::new(1, 2), VehicleDecl::new(1, 2)],
            &config,
        );
        let mut policy = GreedyHeuristicPolicy::new();
        env.reset().unwrap();

        let step = env.step(&mut policy).unwrap();
        assert!(step.done);
        assert_eq!(step.arrived, vec![0, 1]);
        assert!((env.vehicles()[0].elapsed_time() - 1.01).abs() < 1e-12);
        assert!((env.vehicles()[1].elapsed_time() - 1.02).abs() < 1e-12);
        assert_eq!(env.network().total_occupancy(), 0);
    }

    #[test]
    fn travel_time_counts_occupancy() {
        let mut network =
            RoadNetwork::from_topology(&ring_topology(), CongestionModel::default()).unwrap();
        network.enter(1, 2).unwrap();
        network.enter(1, 2).unwrap();
        assert!((network.travel_time(1, 2).value() - 1.02).abs() < 1e-12);
        assert!((network.free_flow_time(1, 2).value() - 1.0).abs() < 1e-12);
        // the opposite direction has its own counter
        assert!((network.travel_time(2, 1).value() - 4.0).abs() < 1e-12);
    }
}

mod unreachable_destination {
    use super::*;

    fn with_island() -> Topology {
        ring_topology().node(7, false)
    }

    #[test]
    fn baseline_reports_unreachable() {
        let network = RoadNetwork::from_topology(&with_island(), CongestionModel::default()).unwrap();
        let report = BaselineEvaluator::default().evaluate(&network, 1, 7);
        assert!(report.is_unreachable());
        assert!(report.paths.is_empty());
        assert_eq!(report.best_path(), None);
        assert!(report.best_cost().is_infinite());
    }

    #[test]
    fn acyclic_vehicle_stalls_instead_of_looping() {
        let config = RoutingConfig {
            episodes: 20,
            ..RoutingConfig::default()
        };
        let env = env_for(&with_island(), &[VehicleDecl::new(1, 7)], &config);
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let summary = trainer.train().unwrap();

        assert_eq!(summary.non_converged_episodes, 0);
        let trip = &summary.rollout.trips[0];
        assert!(matches!(trip.outcome, TripOutcome::Stalled { .. }));
        // every other ring node visited once before running out of moves
        assert_eq!(trip.path.len(), RING.len());
        assert_eq!(trainer.env().network().total_occupancy(), 0);
    }

    #[test]
    fn cyclic_vehicle_is_bounded_by_step_budget() {
        let config = RoutingConfig {
            episodes: 3,
            step_budget: 25,
            acyclic: false,
            ..RoutingConfig::default()
        };
        let env = env_for(&with_island(), &[VehicleDecl::new(1, 7)], &config);
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let summary = trainer.train().unwrap();

        assert_eq!(summary.non_converged_episodes, 3);
        assert_eq!(
            summary.rollout.outcome,
            EpisodeOutcome::NonConvergence { step_budget: 25 }
        );
        assert_eq!(summary.rollout.trips[0].outcome, TripOutcome::InTransit);
        assert_eq!(summary.rollout.steps, 25);
    }
}

mod invariants {
    use super::*;

    fn check(env: &RoutingEnvironment) {
        let network = env.network();
        let held: Vec<_> = env.vehicles().iter().filter_map(|v| v.held_edge()).collect();
        assert_eq!(network.total_occupancy(), held.len() as u64);
        for (from, to, edge) in network.edges() {
            let holders = held.iter().filter(|e| **e == (from, to)).count();
            assert_eq!(edge.occupancy() as usize, holders, "edge {from} -> {to}");
        }

        for vehicle in env.vehicles() {
            let path = vehicle.path();
            assert_eq!(path[0], vehicle.origin);
            assert_eq!(path.last(), Some(&vehicle.current_position()));
            assert_eq!(path.len(), vehicle.steps_taken() + 1);
            for pair in path.windows(2) {
                assert!(network.edge(pair[0], pair[1]).is_some());
            }
        }
    }

    fn exercise(mode: OccupancyMode, acyclic: bool) {
        let config = RoutingConfig {
            epsilon: 0.3,
            step_budget: 12,
            occupancy_mode: mode,
            acyclic,
            ..RoutingConfig::default()
        };
        let vehicles = [
            VehicleDecl::new(1, 5),
            VehicleDecl::new(5, 1),
            VehicleDecl::new(2, 4),
            VehicleDecl::new(6, 3),
        ];
        let mut env = env_for(&ring_topology(), &vehicles, &config);
        let mut policy = LearnedPolicy::new(&config);

        for _ in 0..40 {
            env.reset().unwrap();
            policy.begin_episode(env.network(), env.vehicles());
            check(&env);
            for (vehicle, decl) in env.vehicles().iter().zip(&vehicles) {
                assert_eq!(vehicle.current_position(), decl.origin);
                assert_eq!(vehicle.elapsed_time(), 0.0);
            }

            while !env.all_terminal() && env.t < env.step_budget() {
                env.step(&mut policy).unwrap();
                check(&env);
            }
            policy.end_episode();
        }
    }

    #[test]
    fn hold_across_episodic_training() {
        exercise(OccupancyMode::Episodic, true);
    }

    #[test]
    fn hold_across_continuous_training() {
        exercise(OccupancyMode::Continuous, true);
    }

    #[test]
    fn hold_when_revisits_are_allowed() {
        exercise(OccupancyMode::Continuous, false);
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::*;

    #[test]
    fn rollout_report_serializes() {
        let config = RoutingConfig {
            policy: PolicyKind::Exhaustive,
            episodes: 1,
            ..RoutingConfig::default()
        };
        let env = env_for(&ring_topology(), &[VehicleDecl::new(1, 5)], &config);
        let mut trainer = Trainer::new(env, build_policy(&config), &config);
        let report = trainer.train().unwrap().rollout;

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"path\":[1,6,5]"));
        let back: EpisodeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn store_snapshot_serializes() {
        let config = learning_config(1);
        let env = env_for(&ring_topology(), &[VehicleDecl::new(1, 5)], &config);
        let mut trainer = Trainer::new(env, Box::new(LearnedPolicy::new(&config)), &config);
        let snapshot = trainer.train().unwrap().store.unwrap().snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Vec<(QKey, f64)> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), snapshot.len());
        assert_eq!(back[0].0, snapshot[0].0);
    }
}
