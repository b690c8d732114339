//! Routing algorithms: online route learning and the offline baseline.

pub mod baseline;
pub mod rl;

pub use baseline::{BaselineEvaluator, BaselineReport, BaselineVerdict, OccupancyView, PathCost};
pub use rl::{RoutingConfig, RoutingPolicy};
