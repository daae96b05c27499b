//! Output document types.
//!
//! The generated network is written as one document holding the general
//! counts, the topology with its link table and path table, and the frames.
//! The document is plain serde data and can be written as YAML or JSON.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;
use std::path::Path;

use crate::paths::{PathMode, PathTable};
use crate::settings::{NetworkSettings, SelfHealingProtocol};
use crate::topology::{LinkKind, NetworkGraph, NodeKind};
use crate::traffic::Frame;

// ============================================================================
// General Information
// ============================================================================

/// Counts and network-wide settings
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GeneralInformation {
    pub number_frames: usize,
    pub number_switches: usize,
    pub number_end_systems: usize,
    pub number_links: usize,
    /// Minimum residence time in a switch, ns
    pub minimum_time_switch: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_healing_protocol: Option<SelfHealingProtocol>,
    pub path_mode: PathMode,
}

// ============================================================================
// Topology
// ============================================================================

/// Neighbor reached through a link
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub node_id: usize,
    pub link_id: usize,
}

/// A node with its outgoing and incoming connections
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: usize,
    pub category: NodeKind,
    pub out_connections: Vec<ConnectionRecord>,
    pub in_connections: Vec<ConnectionRecord>,
}

/// One directional link
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: usize,
    pub category: LinkKind,
    /// MB/s
    pub speed: u64,
    pub source: usize,
    pub destination: usize,
}

/// Paths from one sender to one receiver, as link ids
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceiverPaths {
    pub receiver_id: usize,
    pub paths: Vec<Vec<usize>>,
}

/// Paths from one sender to every other end system
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SenderPaths {
    pub sender_id: usize,
    pub receivers: Vec<ReceiverPaths>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TopologyDocument {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
    pub paths: Vec<SenderPaths>,
}

// ============================================================================
// Frames
// ============================================================================

/// A frame as written out; times in ns, size in bytes
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub frame_id: usize,
    pub sender_id: usize,
    pub receivers_id: Vec<usize>,
    pub period: u64,
    pub deadline: u64,
    pub size: u32,
    pub starting_time: u64,
    pub end_to_end: u64,
}

// ============================================================================
// Document
// ============================================================================

/// Everything a generation run produces
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NetworkDocument {
    pub general_information: GeneralInformation,
    pub topology: TopologyDocument,
    pub frames: Vec<FrameRecord>,
}

impl NetworkDocument {
    pub fn new(
        graph: &NetworkGraph,
        path_table: &PathTable,
        frames: &[Frame],
        settings: &NetworkSettings,
    ) -> Self {
        let general_information = GeneralInformation {
            number_frames: frames.len(),
            number_switches: graph.switches().len(),
            number_end_systems: graph.end_systems().len(),
            number_links: graph.link_count(),
            minimum_time_switch: settings.minimum_time_switch,
            self_healing_protocol: settings.self_healing,
            path_mode: settings.path_mode,
        };

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                id: node.id,
                category: node.kind,
                out_connections: graph
                    .out_links(node.id)
                    .map(|(link_id, link)| ConnectionRecord { node_id: link.destination, link_id })
                    .collect(),
                in_connections: graph
                    .in_links(node.id)
                    .map(|(link_id, link)| ConnectionRecord { node_id: link.source, link_id })
                    .collect(),
            })
            .collect();

        let links = graph
            .links()
            .iter()
            .enumerate()
            .map(|(id, link)| LinkRecord {
                id,
                category: link.spec.kind(),
                speed: link.spec.speed(),
                source: link.source,
                destination: link.destination,
            })
            .collect();

        let end_systems = graph.end_systems();
        let paths = end_systems
            .iter()
            .map(|&sender_id| SenderPaths {
                sender_id,
                receivers: end_systems
                    .iter()
                    .filter(|&&receiver_id| receiver_id != sender_id)
                    .map(|&receiver_id| ReceiverPaths {
                        receiver_id,
                        paths: path_table.get(sender_id, receiver_id).to_vec(),
                    })
                    .collect(),
            })
            .collect();

        let frames = frames
            .iter()
            .enumerate()
            .map(|(frame_id, frame)| FrameRecord {
                frame_id,
                sender_id: frame.sender(),
                receivers_id: frame.receivers().to_vec(),
                period: frame.period(),
                deadline: frame.deadline(),
                size: frame.size(),
                starting_time: frame.starting_time(),
                end_to_end: frame.end_to_end(),
            })
            .collect();

        Self {
            general_information,
            topology: TopologyDocument { nodes, links, paths },
            frames,
        }
    }

    /// Render the document in the given format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let rendered = match format {
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(rendered)
    }
}

/// Serialization format of the output document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// JSON for a `.json` extension, YAML otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

/// Write the document to `output_path`, choosing the format by extension
pub fn write_network_document(document: &NetworkDocument, output_path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(output_path);
    let rendered = document.render(format)?;
    std::fs::write(output_path, rendered)
        .wrap_err_with(|| format!("Failed to write network document '{}'", output_path.display()))?;

    info!(
        "Wrote {:?} network document to {:?}: {} nodes, {} links, {} frames",
        format,
        output_path,
        document.topology.nodes.len(),
        document.topology.links.len(),
        document.frames.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::enumerate_paths;
    use crate::topology::build_non_cyclic;
    use tempfile::Builder;

    fn document() -> NetworkDocument {
        let graph = build_non_cyclic("-2", "w100;x54").unwrap();
        let paths = enumerate_paths(&graph, PathMode::Shortest, None);
        let frames = vec![Frame::new(1, vec![2], 1_000_000, 0, 100, 0, 1_000_000).unwrap()];
        let settings = NetworkSettings {
            minimum_time_switch: 1_000,
            self_healing: Some(SelfHealingProtocol::new(10_000, 100).unwrap()),
            ..NetworkSettings::default()
        };
        NetworkDocument::new(&graph, &paths, &frames, &settings)
    }

    #[test]
    fn test_document_contents() {
        let document = document();

        let general = &document.general_information;
        assert_eq!(general.number_switches, 1);
        assert_eq!(general.number_end_systems, 2);
        assert_eq!(general.number_links, 4);
        assert_eq!(general.number_frames, 1);

        let root = &document.topology.nodes[0];
        assert_eq!(
            root.out_connections,
            vec![
                ConnectionRecord { node_id: 1, link_id: 0 },
                ConnectionRecord { node_id: 2, link_id: 2 },
            ]
        );
        assert_eq!(root.in_connections.len(), 2);

        let wireless = document.topology.links[3];
        assert_eq!(wireless.category, LinkKind::Wireless);
        assert_eq!((wireless.source, wireless.destination, wireless.speed), (2, 0, 54));

        assert_eq!(document.topology.paths.len(), 2);
        assert_eq!(document.topology.paths[0].sender_id, 1);
        assert_eq!(document.topology.paths[0].receivers[0].receiver_id, 2);
        assert_eq!(document.topology.paths[0].receivers[0].paths, vec![vec![1, 2]]);

        assert_eq!(document.frames[0].deadline, 1_000_000);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Yaml);
    }

    #[test]
    fn test_write_yaml_and_json() {
        let document = document();

        let yaml_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write_network_document(&document, yaml_file.path()).unwrap();
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(yaml_file.path()).unwrap()).unwrap();
        assert_eq!(yaml["general_information"]["number_links"].as_u64(), Some(4));
        assert_eq!(yaml["topology"]["nodes"][1]["category"].as_str(), Some("end_system"));
        assert_eq!(yaml["general_information"]["self_healing_protocol"]["period"].as_u64(), Some(10_000));

        let json_file = Builder::new().suffix(".json").tempfile().unwrap();
        write_network_document(&document, json_file.path()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_file.path()).unwrap()).unwrap();
        assert_eq!(json["frames"][0]["receivers_id"], serde_json::json!([2]));
        assert_eq!(json["topology"]["links"][1]["category"], "wired");
        assert_eq!(json["general_information"]["path_mode"], "shortest");
    }
}
