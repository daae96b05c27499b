//! Path enumeration between end systems.
//!
//! For every ordered pair of distinct end systems the enumerator stores
//! either one shortest path or every simple path, expressed as link indices
//! into the graph's canonical link list. Pairs without a path get an empty
//! list; every eligible pair is always visited.

use log::{info, warn};
use petgraph::algo::{all_simple_paths, astar};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::topology::NetworkGraph;

/// Which paths to compute for each pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// One minimum-hop path per pair
    #[default]
    Shortest,
    /// Every path without repeated nodes
    #[serde(alias = "all-simple")]
    AllSimple,
}

impl PathMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PathMode::Shortest => "shortest",
            PathMode::AllSimple => "all_simple",
        }
    }
}

/// Paths indexed by `[sender][receiver]`, each path a list of link indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    node_count: usize,
    cells: Vec<Vec<Vec<usize>>>,
}

impl PathTable {
    /// A table with an empty cell for every ordered node pair
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            cells: vec![Vec::new(); node_count * node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Paths from `sender` to `receiver`; empty when none or out of range
    pub fn get(&self, sender: usize, receiver: usize) -> &[Vec<usize>] {
        if sender >= self.node_count || receiver >= self.node_count {
            return &[];
        }
        &self.cells[sender * self.node_count + receiver]
    }

    fn set(&mut self, sender: usize, receiver: usize, paths: Vec<Vec<usize>>) {
        let index = sender * self.node_count + receiver;
        self.cells[index] = paths;
    }

    /// Total number of stored paths
    pub fn path_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

/// Directed view of the graph used by the searches.
///
/// Each edge's weight is the first link index with that source and
/// destination, so node paths map back to link paths in one lookup per hop.
fn search_graph(graph: &NetworkGraph) -> DiGraphMap<usize, usize> {
    let mut map = DiGraphMap::with_capacity(graph.node_count(), graph.link_count());
    for node in graph.nodes() {
        map.add_node(node.id);
    }
    for (index, link) in graph.links().iter().enumerate() {
        if !map.contains_edge(link.source, link.destination) {
            map.add_edge(link.source, link.destination, index);
        }
    }
    map
}

fn to_link_path(map: &DiGraphMap<usize, usize>, nodes: &[usize]) -> Option<Vec<usize>> {
    nodes
        .windows(2)
        .map(|hop| map.edge_weight(hop[0], hop[1]).copied())
        .collect()
}

/// Compute the path table for every ordered pair of distinct end systems
///
/// `max_paths_per_pair` only applies to [`PathMode::AllSimple`]; when it
/// cuts a pair short a warning is logged.
///
/// # Examples
/// ```
/// use ttnetgen::paths::{enumerate_paths, PathMode};
/// use ttnetgen::topology::build_non_cyclic;
///
/// let graph = build_non_cyclic("-2", "w100;w100").unwrap();
/// let table = enumerate_paths(&graph, PathMode::Shortest, None);
/// // 1 -> 0 is link 1, 0 -> 2 is link 2
/// assert_eq!(table.get(1, 2), &[vec![1, 2]]);
/// assert!(table.get(1, 1).is_empty());
/// ```
pub fn enumerate_paths(
    graph: &NetworkGraph,
    mode: PathMode,
    max_paths_per_pair: Option<usize>,
) -> PathTable {
    let map = search_graph(graph);
    let mut table = PathTable::new(graph.node_count());
    let mut disconnected = 0;

    for &sender in graph.end_systems() {
        for &receiver in graph.end_systems() {
            if sender == receiver {
                continue;
            }

            let paths: Vec<Vec<usize>> = match mode {
                PathMode::Shortest => astar(&map, sender, |node| node == receiver, |_| 1usize, |_| 0)
                    .and_then(|(_, nodes)| to_link_path(&map, &nodes))
                    .into_iter()
                    .collect(),
                PathMode::AllSimple => {
                    let found = all_simple_paths::<Vec<usize>, _>(&map, sender, receiver, 0, None);
                    let mut paths: Vec<Vec<usize>> = match max_paths_per_pair {
                        // One extra path tells whether the cap cut anything
                        Some(cap) => found.take(cap.saturating_add(1)).collect(),
                        None => found.collect(),
                    };
                    if let Some(cap) = max_paths_per_pair {
                        if paths.len() > cap {
                            warn!(
                                "Path enumeration {} -> {} capped at {} paths",
                                sender, receiver, cap
                            );
                            paths.truncate(cap);
                        }
                    }
                    paths
                        .iter()
                        .filter_map(|nodes| to_link_path(&map, nodes))
                        .collect()
                }
            };

            if paths.is_empty() {
                warn!("No path from end system {} to end system {}", sender, receiver);
                disconnected += 1;
            }
            table.set(sender, receiver, paths);
        }
    }

    info!(
        "Enumerated {} {} paths between {} end systems ({} disconnected pairs)",
        table.path_count(),
        mode.as_str(),
        graph.end_systems().len(),
        disconnected
    );
    table
}
