//! # ttnetgen - Time-triggered network generator
//!
//! This library generates deterministic-Ethernet network descriptions for use
//! as test inputs to time-triggered schedulers and analyzers.
//!
//! ## Overview
//!
//! A generation run builds a topology of switches and end systems, computes
//! the paths between every ordered pair of end systems, and fills the network
//! with randomly generated time-triggered frames. The result is written as a
//! single YAML or JSON document.
//!
//! ## Key Features
//!
//! - **Non-cyclic topologies**: Compact bifurcation language expanding into trees
//! - **Configurable topologies**: Explicit node and connection lists
//! - **Path enumeration**: Shortest or all simple paths, expressed as link indices
//! - **Traffic generation**: Single, local, multi and broadcast frames by percentage
//! - **Reproducible**: Seeded traffic generation
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `units`: Time and speed units and their conversions
//! - `topology`: Graph model and the two topology builders
//! - `paths`: Path enumeration between end systems
//! - `settings`: Network-wide settings carried to the output
//! - `traffic`: Frames, frame types and the frame generator
//! - `config`: Type-safe configuration structures and YAML parsing
//! - `config_loader`: Configuration file loading
//! - `output`: Output document and writers
//! - `orchestrator`: High-level orchestration of a generation run
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ttnetgen::{config_loader, orchestrator};
//!
//! let config = config_loader::load_config(Path::new("network_config.yaml"))?;
//!
//! let options = orchestrator::GenerationOptions { seed: Some(7), path_mode: None };
//! let network = orchestrator::generate_network_file(&config, &options, Path::new("network.yaml"))?;
//! println!("{} frames generated", network.frames.len());
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! The builders can also be used directly:
//!
//! ```rust
//! use ttnetgen::paths::{enumerate_paths, PathMode};
//! use ttnetgen::topology::build_non_cyclic;
//!
//! // Root switch with two child switches, two end systems on each
//! let graph = build_non_cyclic("2;-2;-2", "w100;w100;w100;w100;w100;w100").unwrap();
//! assert_eq!(graph.end_systems(), &[2, 3, 5, 6]);
//!
//! let paths = enumerate_paths(&graph, PathMode::Shortest, None);
//! assert_eq!(paths.get(2, 5).len(), 1);
//! ```
//!
//! ## Error Handling
//!
//! Library building blocks return typed errors (`TopologyError`,
//! `ValidationError`, `TrafficError`, `UnitError`). Loading and orchestration
//! use `color_eyre` for error reporting with context.

pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod output;
pub mod paths;
pub mod settings;
pub mod topology;
pub mod traffic;
pub mod units;
