//! Graph model shared by the topology builders and the path enumerator.
//!
//! The node table is the owning structure: a node's id is its index and its
//! role is the `kind` field. The switch and end-system lists are views kept
//! in step with the table, in the order nodes took on each role. Links are
//! directional and live in a single canonical list; a link's position in
//! that list is its link index, the unit every path is expressed in.

use super::types::{DirectedLink, LinkSpec, Node, NodeKind, TopologyError};

/// Directed network graph with role views and a canonical link list
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    links: Vec<DirectedLink>,
    switches: Vec<usize>,
    end_systems: Vec<usize>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, kind: NodeKind) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { id, kind });
        id
    }

    /// Append a switch and return its id
    pub fn add_switch(&mut self) -> usize {
        let id = self.add_node(NodeKind::Switch);
        self.switches.push(id);
        id
    }

    /// Append an end system and return its id
    pub fn add_end_system(&mut self) -> usize {
        let id = self.add_node(NodeKind::EndSystem);
        self.end_systems.push(id);
        id
    }

    /// Reclassify a switch as an end system.
    ///
    /// Only the role changes. Links attached to the node stay where they are,
    /// so the node keeps its parent link and becomes a leaf in role only.
    pub fn convert_to_end_system(&mut self, node_id: usize) -> Result<(), TopologyError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(TopologyError::UnknownNode { node: node_id })?;
        if node.kind != NodeKind::Switch {
            return Err(TopologyError::NotASwitch { node: node_id, kind: node.kind });
        }
        node.kind = NodeKind::EndSystem;
        self.switches.retain(|&id| id != node_id);
        self.end_systems.push(node_id);
        Ok(())
    }

    /// Append one directional link and return its link index.
    ///
    /// The reverse direction is not added; callers wanting a physical
    /// bidirectional link call this twice or use [`Self::add_link_pair`].
    pub fn add_link(
        &mut self,
        source: usize,
        destination: usize,
        spec: LinkSpec,
    ) -> Result<usize, TopologyError> {
        for node in [source, destination] {
            if node >= self.nodes.len() {
                return Err(TopologyError::UnknownNode { node });
            }
        }
        self.links.push(DirectedLink { source, destination, spec });
        Ok(self.links.len() - 1)
    }

    /// Add `a -> b` followed by `b -> a` with the same specification
    pub fn add_link_pair(
        &mut self,
        a: usize,
        b: usize,
        spec: LinkSpec,
    ) -> Result<(usize, usize), TopologyError> {
        let forward = self.add_link(a, b, spec)?;
        let backward = self.add_link(b, a, spec)?;
        Ok((forward, backward))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Canonical link list, indexed by link index
    pub fn links(&self) -> &[DirectedLink] {
        &self.links
    }

    pub fn link(&self, index: usize) -> Option<&DirectedLink> {
        self.links.get(index)
    }

    /// Switch ids, in the order they were added
    pub fn switches(&self) -> &[usize] {
        &self.switches
    }

    /// End-system ids, in the order they became end systems
    pub fn end_systems(&self) -> &[usize] {
        &self.end_systems
    }

    pub fn is_end_system(&self, id: usize) -> bool {
        self.nodes.get(id).map_or(false, |node| node.kind == NodeKind::EndSystem)
    }

    /// Links leaving `node`, with their link indices
    pub fn out_links(&self, node: usize) -> impl Iterator<Item = (usize, &DirectedLink)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| link.source == node)
    }

    /// Links arriving at `node`, with their link indices
    pub fn in_links(&self, node: usize) -> impl Iterator<Item = (usize, &DirectedLink)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| link.destination == node)
    }
}
