use super::NodeId;

/// A road network node.
///
/// Intersections impose a fixed extra delay on every vehicle entering them
/// (see [`CongestionModel`](super::CongestionModel)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub is_intersection: bool,
}

impl Node {
    pub fn new(id: NodeId, is_intersection: bool) -> Self {
        Self {
            id,
            is_intersection,
        }
    }
}
