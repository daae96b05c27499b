//! Configurable topology builder.
//!
//! Builds any topology from an explicit node list. All nodes are created
//! first, in declaration order, then every declared connection becomes one
//! directional link. Nothing is mirrored automatically: a bidirectional link
//! is two declarations, one on each node.

use log::info;

use super::graph::NetworkGraph;
use super::types::{LinkSpec, NodeKind, TopologyError};

/// One declared connection from a node to a neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub neighbor: usize,
    pub link: LinkSpec,
}

/// Declaration of one node and its outgoing connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescription {
    pub id: usize,
    pub kind: NodeKind,
    pub connections: Vec<Connection>,
}

impl NodeDescription {
    pub fn new(id: usize, kind: NodeKind) -> Self {
        Self { id, kind, connections: Vec::new() }
    }

    /// Add an outgoing connection, builder style
    pub fn connect(mut self, neighbor: usize, link: LinkSpec) -> Self {
        self.connections.push(Connection { neighbor, link });
        self
    }
}

/// Validate a node list without building anything
pub fn validate_node_descriptions(nodes: &[NodeDescription]) -> Result<(), TopologyError> {
    for (position, node) in nodes.iter().enumerate() {
        if node.id != position {
            return Err(TopologyError::NodeIdMismatch { position, id: node.id });
        }
        match node.kind {
            NodeKind::Switch | NodeKind::EndSystem => {}
            kind => return Err(TopologyError::UnsupportedNodeKind { node: node.id, kind }),
        }
        // Forward references are fine, every node exists before linking
        if let Some(connection) = node.connections.iter().find(|c| c.neighbor >= nodes.len()) {
            return Err(TopologyError::UnknownNeighbor {
                node: node.id,
                neighbor: connection.neighbor,
            });
        }
    }
    Ok(())
}

/// Build a topology from an explicit node list
///
/// # Examples
/// ```
/// use ttnetgen::topology::{build_configurable, LinkSpec, NodeDescription, NodeKind};
///
/// let link = LinkSpec::wired(100).unwrap();
/// let nodes = vec![
///     NodeDescription::new(0, NodeKind::EndSystem).connect(1, link),
///     NodeDescription::new(1, NodeKind::EndSystem).connect(0, link),
/// ];
/// let graph = build_configurable(&nodes).unwrap();
/// assert_eq!(graph.end_systems(), &[0, 1]);
/// assert_eq!(graph.link_count(), 2);
/// ```
pub fn build_configurable(nodes: &[NodeDescription]) -> Result<NetworkGraph, TopologyError> {
    validate_node_descriptions(nodes)?;

    let mut graph = NetworkGraph::new();
    for node in nodes {
        match node.kind {
            NodeKind::Switch => graph.add_switch(),
            _ => graph.add_end_system(),
        };
    }

    for node in nodes {
        for connection in &node.connections {
            graph.add_link(node.id, connection.neighbor, connection.link)?;
        }
    }

    info!(
        "Built configurable topology: {} switches, {} end systems, {} links",
        graph.switches().len(),
        graph.end_systems().len(),
        graph.link_count()
    );
    Ok(graph)
}
