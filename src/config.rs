//! Configuration file model.
//!
//! A configuration has three sections:
//!
//! ```yaml
//! basic_information:
//!   minimum_time_switch: { value: 1, unit: us }
//!   self_healing_protocol:
//!     period: { value: 10, unit: ms }
//!     time: { value: 100, unit: us }
//!   path_mode: shortest
//! topology:
//!   type: non_cyclic
//!   description: "2;-2;-2"
//!   link_description: "w100;w100;w100;w100;w100;w100"
//! traffic:
//!   number_frames: 10
//!   single: 0.25
//!   local: 0.25
//!   multi: 0.25
//!   broadcast: 0.25
//!   frame_types:
//!     - percentage: 1.0
//!       size: 1000
//!       period: { value: 1, unit: ms }
//!       deadline: { value: 1, unit: ms }
//!       end_to_end: { value: 1, unit: ms }
//! ```
//!
//! Values keep their units in the file and are normalised to nanoseconds
//! and MB/s when the sections are converted into their runtime types.

use serde::{Deserialize, Serialize};

use crate::paths::PathMode;
use crate::settings::{NetworkSettings, SelfHealingProtocol};
use crate::topology::configurable::validate_node_descriptions;
use crate::topology::non_cyclic::parse_branch_stream;
use crate::topology::{LinkKind, LinkSpec, NodeDescription, NodeKind, TopologyDescription};
use crate::traffic::{FrameType, ReceiverMix, ReceiverSelection, TrafficProfile};
use crate::units::{to_megabytes_per_second, to_nanoseconds, SpeedUnit, TimeUnit};

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub basic_information: BasicInformation,
    pub topology: TopologyConfig,
    pub traffic: TrafficConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.basic_information.settings()?;
        let topology = self.topology.description()?;
        match &topology {
            TopologyDescription::NonCyclic { description, .. } => {
                parse_branch_stream(description)
                    .map_err(|e| ValidationError::InvalidTopology(e.to_string()))?;
            }
            TopologyDescription::Configurable(nodes) => {
                validate_node_descriptions(nodes)
                    .map_err(|e| ValidationError::InvalidTopology(e.to_string()))?;
            }
        }
        self.traffic.profile()?;
        Ok(())
    }
}

/// A time with its unit, e.g. `{ value: 5, unit: us }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    pub value: u64,
    pub unit: TimeUnit,
}

impl TimeValue {
    pub fn new(value: u64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub fn nanoseconds(&self) -> Result<u64, crate::units::UnitError> {
        to_nanoseconds(self.value, self.unit)
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        Self { value: 0, unit: TimeUnit::Ns }
    }
}

/// A link speed with its unit, e.g. `{ value: 1, unit: GB/s }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedValue {
    pub value: u64,
    pub unit: SpeedUnit,
}

impl SpeedValue {
    pub fn megabytes_per_second(&self) -> Result<u64, crate::units::UnitError> {
        to_megabytes_per_second(self.value, self.unit)
    }
}

/// Network-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInformation {
    pub minimum_time_switch: TimeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_healing_protocol: Option<SelfHealingConfig>,
    #[serde(default)]
    pub path_mode: PathMode,
    /// Cap on all-simple paths per ordered end-system pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths_per_pair: Option<usize>,
}

impl BasicInformation {
    pub fn settings(&self) -> Result<NetworkSettings, ValidationError> {
        let invalid = |e: &dyn std::fmt::Display| ValidationError::InvalidBasic(e.to_string());

        let minimum_time_switch = self.minimum_time_switch.nanoseconds().map_err(|e| invalid(&e))?;
        let self_healing = match &self.self_healing_protocol {
            Some(protocol) => {
                let period = protocol.period.nanoseconds().map_err(|e| invalid(&e))?;
                let time = protocol.time.nanoseconds().map_err(|e| invalid(&e))?;
                Some(SelfHealingProtocol::new(period, time).map_err(|e| invalid(&e))?)
            }
            None => None,
        };
        if self.max_paths_per_pair == Some(0) {
            return Err(ValidationError::InvalidBasic(
                "max_paths_per_pair must be at least 1".to_string(),
            ));
        }

        Ok(NetworkSettings {
            minimum_time_switch,
            self_healing,
            path_mode: self.path_mode,
            max_paths_per_pair: self.max_paths_per_pair,
        })
    }
}

/// Self-healing protocol reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfHealingConfig {
    pub period: TimeValue,
    pub time: TimeValue,
}

/// Topology section, selected by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopologyConfig {
    /// Either raw streams or a list of bifurcations, not both
    NonCyclic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bifurcations: Option<Vec<BifurcationConfig>>,
    },
    Configurable { nodes: Vec<NodeConfig> },
}

impl TopologyConfig {
    /// Convert into a description the topology builders accept
    pub fn description(&self) -> Result<TopologyDescription, ValidationError> {
        match self {
            TopologyConfig::NonCyclic { description, link_description, bifurcations } => {
                let (description, link_description) =
                    match (description, link_description, bifurcations) {
                        (Some(description), link_description, None) => (
                            description.clone(),
                            link_description.clone().unwrap_or_default(),
                        ),
                        (None, None, Some(bifurcations)) => flatten_bifurcations(bifurcations)?,
                        (None, Some(_), None) => {
                            return Err(ValidationError::InvalidTopology(
                                "link_description given without a description".to_string(),
                            ))
                        }
                        (None, None, None) => {
                            return Err(ValidationError::InvalidTopology(
                                "non_cyclic topology needs a description or bifurcations".to_string(),
                            ))
                        }
                        _ => {
                            return Err(ValidationError::InvalidTopology(
                                "use either description/link_description or bifurcations, not both"
                                    .to_string(),
                            ))
                        }
                    };
                Ok(TopologyDescription::NonCyclic { description, link_description })
            }
            TopologyConfig::Configurable { nodes } => {
                let nodes = nodes
                    .iter()
                    .map(NodeConfig::to_description)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TopologyDescription::Configurable(nodes))
            }
        }
    }
}

/// One bifurcation: a signed branch count and one link per created node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BifurcationConfig {
    pub links: i64,
    #[serde(default)]
    pub link_list: Vec<LinkConfig>,
}

/// Turn a bifurcation list into a branch stream and a link stream
pub fn flatten_bifurcations(
    bifurcations: &[BifurcationConfig],
) -> Result<(String, String), ValidationError> {
    if bifurcations.is_empty() {
        return Err(ValidationError::InvalidTopology("bifurcation list is empty".to_string()));
    }

    let mut branches = Vec::with_capacity(bifurcations.len());
    let mut links = Vec::new();
    for (position, bifurcation) in bifurcations.iter().enumerate() {
        let expected = bifurcation.links.unsigned_abs();
        if expected != bifurcation.link_list.len() as u64 {
            return Err(ValidationError::InvalidTopology(format!(
                "bifurcation {} declares {} links but describes {}",
                position,
                bifurcation.links,
                bifurcation.link_list.len()
            )));
        }
        branches.push(bifurcation.links.to_string());
        for link in &bifurcation.link_list {
            links.push(link.to_spec()?.to_token());
        }
    }
    Ok((branches.join(";"), links.join(";")))
}

/// Link medium and speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub category: LinkKind,
    pub speed: SpeedValue,
}

impl LinkConfig {
    pub fn to_spec(&self) -> Result<LinkSpec, ValidationError> {
        let speed = self
            .speed
            .megabytes_per_second()
            .map_err(|e| ValidationError::InvalidTopology(e.to_string()))?;
        LinkSpec::new(self.category, speed).map_err(|e| ValidationError::InvalidTopology(e.to_string()))
    }
}

/// A node of a configurable topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: usize,
    pub category: NodeKind,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

impl NodeConfig {
    pub fn to_description(&self) -> Result<NodeDescription, ValidationError> {
        let mut node = NodeDescription::new(self.id, self.category);
        for connection in &self.connections {
            node = node.connect(connection.node_id, connection.link.to_spec()?);
        }
        Ok(node)
    }
}

/// Outgoing connection of a configurable node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub node_id: usize,
    pub link: LinkConfig,
}

/// Traffic section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficConfig {
    pub number_frames: usize,
    pub single: f64,
    pub local: f64,
    pub multi: f64,
    pub broadcast: f64,
    #[serde(default)]
    pub receiver_selection: ReceiverSelection,
    pub frame_types: Vec<FrameTypeConfig>,
}

impl TrafficConfig {
    pub fn profile(&self) -> Result<TrafficProfile, ValidationError> {
        let invalid = |e: &dyn std::fmt::Display| ValidationError::InvalidTraffic(e.to_string());

        let mix = ReceiverMix::new(self.single, self.local, self.multi, self.broadcast)
            .map_err(|e| invalid(&e))?;
        let frame_types = self
            .frame_types
            .iter()
            .enumerate()
            .map(|(index, frame_type)| {
                frame_type.to_frame_type().map_err(|e| {
                    ValidationError::InvalidTraffic(format!("frame type {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        TrafficProfile::new(self.number_frames, mix, frame_types, self.receiver_selection)
            .map_err(|e| invalid(&e))
    }
}

/// One class of traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTypeConfig {
    pub percentage: f64,
    /// Bytes
    pub size: u32,
    pub period: TimeValue,
    pub deadline: TimeValue,
    #[serde(default)]
    pub starting_time: TimeValue,
    pub end_to_end: TimeValue,
}

impl FrameTypeConfig {
    fn to_frame_type(&self) -> Result<FrameType, Box<dyn std::error::Error + Send + Sync>> {
        Ok(FrameType::new(
            self.percentage,
            self.period.nanoseconds()?,
            self.deadline.nanoseconds()?,
            self.size,
            self.starting_time.nanoseconds()?,
            self.end_to_end.nanoseconds()?,
        )?)
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid basic information: {0}")]
    InvalidBasic(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid traffic configuration: {0}")]
    InvalidTraffic(String),
}
