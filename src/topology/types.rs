//! Topology type definitions.
//!
//! Node and link kinds, link specifications, and the errors raised while
//! building a topology from one of the supported descriptions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a node in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Forwarding node, never originates or terminates traffic
    Switch,
    /// Node that sends and receives time-triggered frames
    EndSystem,
    /// Wireless access point
    AccessPoint,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Switch => "switch",
            NodeKind::EndSystem => "end_system",
            NodeKind::AccessPoint => "access_point",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical medium of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Wired,
    Wireless,
}

impl LinkKind {
    /// Single character used in non-cyclic link descriptions
    pub fn token_char(self) -> char {
        match self {
            LinkKind::Wired => 'w',
            LinkKind::Wireless => 'x',
        }
    }

    pub fn from_token_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(LinkKind::Wired),
            'x' => Some(LinkKind::Wireless),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Wired => "wired",
            LinkKind::Wireless => "wireless",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medium and speed of a link, speed in MB/s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkSpec {
    kind: LinkKind,
    speed: u64,
}

impl LinkSpec {
    /// Create a link specification; the speed must be positive
    pub fn new(kind: LinkKind, speed: u64) -> Result<Self, TopologyError> {
        if speed == 0 {
            return Err(TopologyError::InvalidSpeed { speed });
        }
        Ok(Self { kind, speed })
    }

    pub fn wired(speed: u64) -> Result<Self, TopologyError> {
        Self::new(LinkKind::Wired, speed)
    }

    pub fn wireless(speed: u64) -> Result<Self, TopologyError> {
        Self::new(LinkKind::Wireless, speed)
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Speed in MB/s
    pub fn speed(&self) -> u64 {
        self.speed
    }

    /// Encode as a non-cyclic link token, e.g. `w100`
    pub fn to_token(&self) -> String {
        format!("{}{}", self.kind.token_char(), self.speed)
    }
}

/// A node of the graph; its id is its position in the node table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub id: usize,
    pub kind: NodeKind,
}

/// One direction of a physical link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectedLink {
    pub source: usize,
    pub destination: usize,
    pub spec: LinkSpec,
}

/// Errors raised while building a topology
///
/// Every variant aborts the whole build; no partial graph is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid bifurcation '{token}' at position {position}")]
    InvalidBifurcation { position: usize, token: String },

    #[error("Invalid link token '{token}' at position {position}: expected 'w' or 'x' followed by a speed")]
    InvalidLinkToken { position: usize, token: String },

    #[error("Link speed must be positive, got {speed}")]
    InvalidSpeed { speed: u64 },

    #[error("Description has open branches: bifurcation {position} is missing")]
    OpenBranch { position: usize },

    #[error("Link description too short: link {index} is needed but only {available} were given")]
    MissingLinkToken { index: usize, available: usize },

    #[error("Description has {leftover} unused bifurcation(s) after position {last_used}")]
    UnusedBifurcations { last_used: usize, leftover: usize },

    #[error("Link description has {given} links but the description uses {used}")]
    UnusedLinkTokens { used: usize, given: usize },

    #[error("Node declared at position {position} has id {id}; ids must follow declaration order")]
    NodeIdMismatch { position: usize, id: usize },

    #[error("Node {node} has unsupported kind '{kind}'")]
    UnsupportedNodeKind { node: usize, kind: NodeKind },

    #[error("Node {node} connects to undeclared node {neighbor}")]
    UnknownNeighbor { node: usize, neighbor: usize },

    #[error("Node {node} does not exist")]
    UnknownNode { node: usize },

    #[error("Node {node} is a {kind}, only switches can become end systems")]
    NotASwitch { node: usize, kind: NodeKind },
}
