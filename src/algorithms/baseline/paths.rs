//! Depth-first enumeration of simple paths.

use std::collections::HashSet;

use crate::network::{NodeId, RoadNetwork};

/// Enumerates every simple (node-repetition-free) path from `origin` to
/// `destination`, in DFS order over ascending neighbour ids.
///
/// Exponential in path length on dense graphs; keep it out of hot loops.
pub fn simple_paths(network: &RoadNetwork, origin: NodeId, destination: NodeId) -> Vec<Vec<NodeId>> {
    let mut found = Vec::new();
    if !network.contains_node(origin) || !network.contains_node(destination) {
        return found;
    }
    let mut path = vec![origin];
    let mut on_path = HashSet::from([origin]);
    walk(network, destination, &mut path, &mut on_path, &mut found);
    found
}

fn walk(
    network: &RoadNetwork,
    destination: NodeId,
    path: &mut Vec<NodeId>,
    on_path: &mut HashSet<NodeId>,
    found: &mut Vec<Vec<NodeId>>,
) {
    let Some(&current) = path.last() else {
        return;
    };
    if current == destination {
        found.push(path.clone());
        return;
    }
    for next in network.neighbors(current) {
        if !on_path.insert(next) {
            continue;
        }
        path.push(next);
        walk(network, destination, path, on_path, found);
        path.pop();
        on_path.remove(&next);
    }
}
