//! ε-greedy action selection with an injected, seeded random source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::error::RoutingError;
use super::q_table::PolicyStore;
use super::types::StateKey;
use crate::network::NodeId;

/// Chooses the next node for a vehicle.
///
/// With probability `epsilon` a uniformly random candidate is returned;
/// otherwise the candidate with the highest stored value, ties going to the
/// lowest node id.
#[derive(Debug, Clone)]
pub struct ActionSelector {
    rng: StdRng,
    epsilon: f64,
}

impl ActionSelector {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self::with_rng(epsilon, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(epsilon: f64, rng: StdRng) -> Self {
        Self { rng, epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// # Errors
    ///
    /// `NoReachableAction` when `candidates` is empty.
    pub fn select(
        &mut self,
        store: &PolicyStore,
        state: StateKey,
        candidates: &[NodeId],
    ) -> Result<NodeId, RoutingError> {
        let no_action = RoutingError::NoReachableAction {
            node: state.node,
            destination: state.destination,
        };
        if candidates.is_empty() {
            return Err(no_action);
        }
        if self.rng.gen::<f64>() < self.epsilon {
            return candidates.choose(&mut self.rng).copied().ok_or(no_action);
        }
        store.best_action(state, candidates).ok_or(no_action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_picks_highest_value() {
        let mut store = PolicyStore::new();
        let state = StateKey::new(1, 5);
        store.td_update(state.with_action(2), -7.0, 0.0, 1.0, 1.0);
        store.td_update(state.with_action(6), -5.0, 0.0, 1.0, 1.0);
        let mut selector = ActionSelector::new(0.0, 7);
        for _ in 0..20 {
            assert_eq!(selector.select(&store, state, &[2, 6]), Ok(6));
        }
    }

    #[test]
    fn empty_candidates_is_no_reachable_action() {
        let mut selector = ActionSelector::new(0.5, 7);
        let err = selector
            .select(&PolicyStore::new(), StateKey::new(4, 9), &[])
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::NoReachableAction {
                node: 4,
                destination: 9
            }
        );
    }

    #[test]
    fn full_exploration_visits_every_candidate() {
        let mut store = PolicyStore::new();
        let state = StateKey::new(1, 5);
        store.td_update(state.with_action(2), -100.0, 0.0, 1.0, 1.0);
        let mut selector = ActionSelector::new(1.0, 11);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(selector.select(&store, state, &[2, 4, 6]).unwrap());
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![2, 4, 6]);
    }

    #[test]
    fn same_seed_same_choices() {
        let store = PolicyStore::new();
        let state = StateKey::new(1, 5);
        let mut a = ActionSelector::new(0.5, 99);
        let mut b = ActionSelector::new(0.5, 99);
        for _ in 0..50 {
            assert_eq!(
                a.select(&store, state, &[2, 3, 4]),
                b.select(&store, state, &[2, 3, 4])
            );
        }
    }

    #[test]
    fn set_epsilon_clamps() {
        let mut selector = ActionSelector::new(0.1, 1);
        selector.set_epsilon(3.0);
        assert_eq!(selector.epsilon(), 1.0);
        selector.set_epsilon(-1.0);
        assert_eq!(selector.epsilon(), 0.0);
    }
}
