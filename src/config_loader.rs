use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load, parse and validate a YAML configuration file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Configuration loaded: {} topology, {} frames requested",
        match &config.topology {
            crate::config::TopologyConfig::NonCyclic { .. } => "non-cyclic",
            crate::config::TopologyConfig::Configurable { .. } => "configurable",
        },
        config.traffic.number_frames
    );
    Ok(config)
}
