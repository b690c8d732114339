//! Directed road segment with an occupancy counter.

/// A directed road segment.
///
/// # Invariants
///
/// - `occupancy` never goes negative; [`exit`](Self::exit) refuses to release
///   an empty edge instead of clamping
/// - Every [`enter`](Self::enter) is matched by exactly one later `exit` for
///   the same logical occupation
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    base_time: f64,
    occupancy: u32,
    /// Per-edge value estimate, for variants that learn on edges rather than
    /// state-action pairs.
    pub learned_value: Option<f64>,
}

impl Edge {
    pub fn new(base_time: f64) -> Self {
        Self {
            base_time,
            occupancy: 0,
            learned_value: None,
        }
    }

    pub fn base_time(&self) -> f64 {
        self.base_time
    }

    /// Number of vehicles currently traversing this edge.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Registers a vehicle on this edge and returns the new occupancy.
    pub fn enter(&mut self) -> u32 {
        self.occupancy += 1;
        self.occupancy
    }

    /// Releases one vehicle. Returns `None` when the edge is already empty.
    pub fn exit(&mut self) -> Option<u32> {
        self.occupancy = self.occupancy.checked_sub(1)?;
        Some(self.occupancy)
    }

    pub(crate) fn clear(&mut self) {
        self.occupancy = 0;
    }
}

impl Default for Edge {
    fn default() -> Self {
        Self::new(1.0)
    }
}
