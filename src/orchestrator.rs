//! Generation orchestrator.
//!
//! This module runs one generation from a validated configuration: build
//! the topology, enumerate the paths between end systems, generate the
//! traffic and assemble the output document.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use crate::config::Config;
use crate::output::{write_network_document, NetworkDocument};
use crate::paths::{enumerate_paths, PathMode, PathTable};
use crate::settings::NetworkSettings;
use crate::topology::{build_topology, NetworkGraph};
use crate::traffic::{generate_frames, Frame};

/// Run-time choices that override or complete the configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Seed for the traffic generator; entropy when absent
    pub seed: Option<u64>,
    /// Replaces the file's path mode when set
    pub path_mode: Option<PathMode>,
}

/// Result of one generation run
#[derive(Debug, Clone)]
pub struct GeneratedNetwork {
    pub graph: NetworkGraph,
    pub paths: PathTable,
    pub frames: Vec<Frame>,
    pub settings: NetworkSettings,
}

impl GeneratedNetwork {
    pub fn document(&self) -> NetworkDocument {
        NetworkDocument::new(&self.graph, &self.paths, &self.frames, &self.settings)
    }
}

/// Generate a network from a configuration
pub fn generate_network(config: &Config, options: &GenerationOptions) -> Result<GeneratedNetwork> {
    let mut settings = config.basic_information.settings()?;
    if let Some(path_mode) = options.path_mode {
        settings.path_mode = path_mode;
    }

    let description = config.topology.description()?;
    let graph = build_topology(&description).wrap_err("Failed to build topology")?;

    let paths = enumerate_paths(&graph, settings.path_mode, settings.max_paths_per_pair);

    let profile = config.traffic.profile()?;
    let mut rng = match options.seed {
        Some(seed) => {
            info!("Generating traffic with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let frames = generate_frames(&graph, &profile, &mut rng).wrap_err("Failed to generate traffic")?;

    Ok(GeneratedNetwork { graph, paths, frames, settings })
}

/// Generate a network and write its document to `output_path`
pub fn generate_network_file(
    config: &Config,
    options: &GenerationOptions,
    output_path: &Path,
) -> Result<GeneratedNetwork> {
    let network = generate_network(config, options)?;
    write_network_document(&network.document(), output_path)?;
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn config(topology: &str) -> Config {
        let yaml = format!(
            r#"
basic_information:
  minimum_time_switch: {{ value: 2, unit: us }}
  path_mode: all_simple
{}
traffic:
  number_frames: 6
  single: 0.0
  local: 0.5
  multi: 0.5
  broadcast: 0.0
  frame_types:
    - percentage: 1.0
      size: 500
      period: {{ value: 1, unit: ms }}
      deadline: {{ value: 1, unit: ms }}
      end_to_end: {{ value: 1, unit: ms }}
"#,
            topology
        );
        serde_yaml::from_str(&yaml).unwrap()
    }

    const TREE: &str = r#"
topology:
  type: non_cyclic
  description: "2;-2;-2"
  link_description: "w100;w100;w100;w100;w100;w100"
"#;

    #[test]
    fn test_generate_tree_network() {
        let options = GenerationOptions { seed: Some(11), path_mode: None };
        let network = generate_network(&config(TREE), &options).unwrap();

        assert_eq!(network.graph.node_count(), 7);
        assert_eq!(network.settings.path_mode, PathMode::AllSimple);
        assert_eq!(network.settings.minimum_time_switch, 2_000);
        assert_eq!(network.paths.path_count(), 12);
        assert_eq!(network.frames.len(), 6);
        for frame in &network.frames {
            assert!(network.graph.is_end_system(frame.sender()));
            assert_eq!(frame.period(), 1_000_000);
        }
    }

    #[test]
    fn test_seed_makes_runs_reproducible() {
        let options = GenerationOptions { seed: Some(42), path_mode: None };
        let first = generate_network(&config(TREE), &options).unwrap();
        let second = generate_network(&config(TREE), &options).unwrap();
        assert_eq!(first.frames, second.frames);
    }

    #[test]
    fn test_path_mode_override() {
        let options = GenerationOptions { seed: Some(1), path_mode: Some(PathMode::Shortest) };
        let network = generate_network(&config(TREE), &options).unwrap();
        assert_eq!(network.settings.path_mode, PathMode::Shortest);
        assert_eq!(network.document().general_information.path_mode, PathMode::Shortest);
    }

    #[test]
    fn test_malformed_description_fails() {
        let topology = r#"
topology:
  type: non_cyclic
  description: "-2;-3"
  link_description: "w1;w1"
"#;
        let error = generate_network(&config(topology), &GenerationOptions::default()).unwrap_err();
        assert!(error.to_string().contains("Failed to build topology"));
    }

    #[test]
    fn test_generate_network_file() {
        let output = Builder::new().suffix(".json").tempfile().unwrap();
        let options = GenerationOptions { seed: Some(3), path_mode: None };
        let network = generate_network_file(&config(TREE), &options, output.path()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.path()).unwrap()).unwrap();
        assert_eq!(
            written["general_information"]["number_frames"].as_u64(),
            Some(network.frames.len() as u64)
        );
        assert_eq!(written["topology"]["links"].as_array().map(Vec::len), Some(12));
    }
}
