//! Policy store: flat Q-table keyed by `(node, destination, action)`.
//!
//! # Sign convention
//!
//! Rewards are **negative travel times**. A value `Q(s, a)` therefore
//! estimates minus the time still to be spent when taking `a` from `s`, and
//! the greedy action is the one with the *largest* (least negative) value,
//! i.e. the shortest expected remaining trip. Feeding positive travel times
//! in as rewards would make the greedy policy seek the slowest route.

use std::collections::HashMap;

use super::types::{QKey, StateKey};
use crate::network::NodeId;

/// Learned values shared by every vehicle with the same destination.
///
/// Entries are created lazily on first update; unrecorded entries read as 0.
/// Nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyStore {
    values: HashMap<QKey, f64>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded `(state, action)` entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, state: StateKey, action: NodeId) -> f64 {
        self.values
            .get(&state.with_action(action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, state: StateKey, action: NodeId) -> bool {
        self.values.contains_key(&state.with_action(action))
    }

    /// `max_a Q(state, a)` over `candidates`; 0 when there are none.
    pub fn max_value(&self, state: StateKey, candidates: &[NodeId]) -> f64 {
        candidates
            .iter()
            .map(|&a| self.value(state, a))
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
            .unwrap_or(0.0)
    }

    /// Greedy action over `candidates`, ties broken by the lowest node id.
    pub fn best_action(&self, state: StateKey, candidates: &[NodeId]) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for &a in candidates {
            let v = self.value(state, a);
            best = match best {
                Some((b, bv)) if bv > v || (bv == v && b < a) => Some((b, bv)),
                _ => Some((a, v)),
            };
        }
        best.map(|(a, _)| a)
    }

    /// Applies one temporal-difference update and returns `|ΔQ|`.
    ///
    /// ```text
    /// Q(s, a) ← (1 − α)·Q(s, a) + α·(reward + γ·future)
    /// ```
    ///
    /// `future` is `max_a' Q(s', a')`, or 0 for terminal transitions. The new
    /// value is computed in full before the single map write, so an
    /// interrupted run never observes half an update.
    pub fn td_update(&mut self, key: QKey, reward: f64, future: f64, alpha: f64, gamma: f64) -> f64 {
        let old = self.values.get(&key).copied().unwrap_or(0.0);
        let new = (1.0 - alpha) * old + alpha * (reward + gamma * future);
        self.values.insert(key, new);
        (new - old).abs()
    }

    /// All entries, sorted by key.
    pub fn snapshot(&self) -> Vec<(QKey, f64)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Recorded actions and values for one state, sorted by action.
    pub fn actions(&self, state: StateKey) -> Vec<(NodeId, f64)> {
        let mut out: Vec<_> = self
            .values
            .iter()
            .filter(|(k, _)| k.state() == state)
            .map(|(k, v)| (k.action, *v))
            .collect();
        out.sort_by_key(|(a, _)| *a);
        out
    }
}
