use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ttnetgen::config_loader;
use ttnetgen::orchestrator::{generate_network_file, GenerationOptions};
use ttnetgen::paths::PathMode;

/// Time-triggered network generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output file; a .json extension writes JSON, anything else YAML
    #[arg(short, long, default_value = "network.yaml")]
    output: PathBuf,

    /// Seed for reproducible traffic generation
    #[arg(long)]
    seed: Option<u64>,

    /// Path mode, overriding the configuration file
    #[arg(long, value_enum)]
    path_mode: Option<PathMode>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting ttnetgen");
    info!("Configuration file: {:?}", args.config);
    info!("Output file: {:?}", args.output);

    let config = config_loader::load_config(&args.config)?;

    let options = GenerationOptions {
        seed: args.seed,
        path_mode: args.path_mode,
    };
    let network = generate_network_file(&config, &options, &args.output)?;

    println!("Generated network description at {:?}", args.output);
    println!("  - Switches: {}", network.graph.switches().len());
    println!("  - End systems: {}", network.graph.end_systems().len());
    println!("  - Links: {}", network.graph.link_count());
    println!("  - Paths ({}): {}", network.settings.path_mode.as_str(), network.paths.path_count());
    println!("  - Frames: {}", network.frames.len());

    info!("Generation completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["ttnetgen", "--config", "test.yaml"]);

        assert_eq!(args.config, PathBuf::from("test.yaml"));
        assert_eq!(args.output, PathBuf::from("network.yaml"));
        assert_eq!(args.seed, None);
        assert_eq!(args.path_mode, None);
    }

    #[test]
    fn test_generation_args() {
        let args = Args::parse_from([
            "ttnetgen",
            "--config", "test.yaml",
            "--output", "out.json",
            "--seed", "42",
            "--path-mode", "all-simple",
        ]);

        assert_eq!(args.output, PathBuf::from("out.json"));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.path_mode, Some(PathMode::AllSimple));
    }

    #[test]
    fn test_config_is_required() {
        assert!(Args::try_parse_from(["ttnetgen"]).is_err());
    }
}
