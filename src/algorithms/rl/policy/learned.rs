//! Q-learning policy.

use super::super::config::RoutingConfig;
use super::super::error::RoutingError;
use super::super::q_table::PolicyStore;
use super::super::selector::ActionSelector;
use super::super::types::Transition;
use super::trait_::{DecisionContext, PolicyMode, RoutingPolicy};
use crate::network::NodeId;

/// ε-greedy tabular Q-learning over `(node, destination, next node)`.
///
/// One store is shared by every vehicle it drives, so a vehicle's experience
/// immediately shapes the routes of others heading to the same destination.
#[derive(Debug, Clone)]
pub struct LearnedPolicy {
    store: PolicyStore,
    selector: ActionSelector,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    mode: PolicyMode,
}

impl LearnedPolicy {
    pub fn new(config: &RoutingConfig) -> Self {
        Self::with_store(config, PolicyStore::new())
    }

    /// Continues learning from an existing store.
    pub fn with_store(config: &RoutingConfig, store: PolicyStore) -> Self {
        Self {
            store,
            selector: ActionSelector::new(config.epsilon, config.seed),
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            min_epsilon: config.min_epsilon,
            mode: PolicyMode::Train,
        }
    }

    pub fn store(&self) -> &PolicyStore {
        &self.store
    }

    pub fn into_store(self) -> PolicyStore {
        self.store
    }

    /// Exploration rate used while training.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

impl RoutingPolicy for LearnedPolicy {
    fn choose(&mut self, ctx: &DecisionContext<'_>) -> Result<NodeId, RoutingError> {
        self.selector
            .select(&self.store, ctx.vehicle.state(), ctx.candidates)
    }

    fn observe(&mut self, transition: &Transition) -> f64 {
        if self.mode == PolicyMode::Exploit {
            return 0.0;
        }
        let future = if transition.arrived {
            0.0
        } else {
            self.store
                .max_value(transition.next_state(), &transition.next_candidates)
        };
        self.store.td_update(
            transition.state().with_action(transition.to),
            transition.reward,
            future,
            self.alpha,
            self.gamma,
        )
    }

    fn end_episode(&mut self) {
        if self.mode == PolicyMode::Train {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
            self.selector.set_epsilon(self.epsilon);
        }
    }

    fn set_mode(&mut self, mode: PolicyMode) {
        self.mode = mode;
        match mode {
            PolicyMode::Train => self.selector.set_epsilon(self.epsilon),
            PolicyMode::Exploit => self.selector.set_epsilon(0.0),
        }
    }

    fn policy_store(&self) -> Option<&PolicyStore> {
        Some(&self.store)
    }

    fn name(&self) -> &str {
        "q_learning"
    }
}
