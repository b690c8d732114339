//! Exhaustive baseline path evaluator (diagnostic only).
//!
//! Enumerates every simple path between two nodes, prices each one under a
//! static occupancy snapshot and reports the cheapest. Used to check that a
//! learned route is within tolerance of the offline optimum.

pub mod paths;

use std::fmt;

use crate::network::{NodeId, RoadNetwork};

pub use paths::simple_paths;

/// Which occupancy the static path cost is computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccupancyView {
    /// Occupancy as currently recorded in the network.
    Current,
    /// Free flow: every edge read as empty.
    #[default]
    Zero,
}

/// A simple path and its static cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathCost {
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Outcome of a baseline evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineVerdict {
    Optimal(PathCost),
    /// No simple path exists; the optimal cost is +infinity.
    UnreachableDestination { origin: NodeId, destination: NodeId },
}

/// All simple paths between two nodes, cheapest first, with the verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineReport {
    pub origin: NodeId,
    pub destination: NodeId,
    /// Sorted by cost, then lexicographically by node sequence.
    pub paths: Vec<PathCost>,
    pub verdict: BaselineVerdict,
}

impl BaselineReport {
    /// The optimal static cost, or `f64::INFINITY` when unreachable.
    pub fn best_cost(&self) -> f64 {
        match &self.verdict {
            BaselineVerdict::Optimal(best) => best.cost,
            BaselineVerdict::UnreachableDestination { .. } => f64::INFINITY,
        }
    }

    pub fn best_path(&self) -> Option<&[NodeId]> {
        match &self.verdict {
            BaselineVerdict::Optimal(best) => Some(&best.path),
            BaselineVerdict::UnreachableDestination { .. } => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self.verdict, BaselineVerdict::UnreachableDestination { .. })
    }

    /// Whether `cost` is within `tolerance` (absolute) of the optimum.
    /// Always false when the destination is unreachable.
    pub fn within(&self, cost: f64, tolerance: f64) -> bool {
        !self.is_unreachable() && cost.is_finite() && cost <= self.best_cost() + tolerance
    }
}

impl fmt::Display for BaselineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Paths {} -> {}:", self.origin, self.destination)?;
        for p in &self.paths {
            writeln!(f, "  {:?}  cost {:.2}", p.path, p.cost)?;
        }
        match &self.verdict {
            BaselineVerdict::Optimal(best) => {
                write!(f, "  best {:?} with cost {:.2}", best.path, best.cost)
            }
            BaselineVerdict::UnreachableDestination { .. } => write!(f, "  unreachable"),
        }
    }
}

/// Offline evaluator over all simple paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineEvaluator {
    pub occupancy: OccupancyView,
}

impl BaselineEvaluator {
    pub fn new(occupancy: OccupancyView) -> Self {
        Self { occupancy }
    }

    /// Static cost of `path`; +infinity if any hop has no edge.
    pub fn path_cost(&self, network: &RoadNetwork, path: &[NodeId]) -> f64 {
        path.windows(2)
            .map(|hop| match self.occupancy {
                OccupancyView::Current => network.travel_time(hop[0], hop[1]).value(),
                OccupancyView::Zero => network.free_flow_time(hop[0], hop[1]).value(),
            })
            .sum()
    }

    pub fn evaluate(&self, network: &RoadNetwork, origin: NodeId, destination: NodeId) -> BaselineReport {
        let mut paths: Vec<PathCost> = simple_paths(network, origin, destination)
            .into_iter()
            .map(|path| PathCost {
                cost: self.path_cost(network, &path),
                path,
            })
            .collect();
        paths.sort_by(|a, b| a.cost.total_cmp(&b.cost).then_with(|| a.path.cmp(&b.path)));

        let verdict = match paths.first() {
            Some(best) => BaselineVerdict::Optimal(best.clone()),
            None => BaselineVerdict::UnreachableDestination {
                origin,
                destination,
            },
        };

        BaselineReport {
            origin,
            destination,
            paths,
            verdict,
        }
    }
}
