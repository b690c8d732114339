use thiserror::Error;

use super::types::VehicleId;
use crate::network::{NetworkError, NodeId};

/// Failures raised while choosing or applying a vehicle move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The vehicle has no admissible outgoing edge. The scheduler records the
    /// vehicle as stalled and keeps going with the others.
    #[error("No reachable action from node {node} towards {destination}")]
    NoReachableAction { node: NodeId, destination: NodeId },

    #[error("Vehicle {vehicle} declares unknown node {node}")]
    UnknownVehicleNode { vehicle: VehicleId, node: NodeId },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// A hyperparameter outside its accepted range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Option `{option}` = {value} is outside {expected}")]
    OutOfRange {
        option: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(option: &'static str, value: f64, expected: &'static str) -> Self {
        ConfigError::OutOfRange {
            option,
            value,
            expected,
        }
    }
}

/// Any failure surfaced by a full simulation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
