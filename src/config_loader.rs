use crate::config::Config;
use crate::topology::TopologyKind;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub topology: Option<TopologyKind>,
    pub num_cpus: Option<usize>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(topology) = overrides.topology {
        info!("Overriding topology: {} -> {}", config.topology, topology);
        config.topology = topology;
    }

    if let Some(num_cpus) = overrides.num_cpus {
        info!("Overriding num_cpus: {} -> {}", config.options.num_cpus, num_cpus);
        config.options.num_cpus = num_cpus;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
