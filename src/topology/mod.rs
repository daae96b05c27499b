//! Network topology module.
//!
//! This module contains the graph model and the two ways of building it:
//! the compact non-cyclic description language and the explicit
//! node-by-node configurable description.

pub mod configurable;
pub mod graph;
pub mod non_cyclic;
pub mod types;

// Re-export key types and functions for easier access
pub use configurable::{build_configurable, Connection, NodeDescription};
pub use graph::NetworkGraph;
pub use non_cyclic::{build_non_cyclic, expand_non_cyclic};
pub use types::{DirectedLink, LinkKind, LinkSpec, Node, NodeKind, TopologyError};

/// A complete topology description, in one of the supported forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyDescription {
    /// Tree described by a branch stream and a link stream
    NonCyclic { description: String, link_description: String },
    /// Explicit node list
    Configurable(Vec<NodeDescription>),
}

impl TopologyDescription {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NonCyclic { .. } => "non-cyclic",
            Self::Configurable(_) => "configurable",
        }
    }
}

/// Build the graph for a topology description
pub fn build_topology(description: &TopologyDescription) -> Result<NetworkGraph, TopologyError> {
    log::info!("Building {} topology", description.kind_name());
    match description {
        TopologyDescription::NonCyclic { description, link_description } => {
            build_non_cyclic(description, link_description)
        }
        TopologyDescription::Configurable(nodes) => build_configurable(nodes),
    }
}
