//! Network description orchestrator.
//!
//! This module coordinates the overall generation process: node list
//! expansion, topology construction, memory registration and writing
//! the resulting description for the simulator.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::{Config, ConfigurationError};
use crate::registry::{register_topology, NodeMemoryMap};
use crate::topology::{build_topology, resolve_dims, ExtLink, IntLink, Node, Router, TopologyKind, TorusDims};
use crate::utils::validation::validate_graph;

/// Serialisation format of the generated description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Pick a format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format '{}' (expected json or yaml)", other)),
        }
    }
}

/// Everything the simulator's network object needs, in one document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkDescription {
    pub topology: TopologyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torus_dims: Option<TorusDims>,
    pub nodes: Vec<Node>,
    pub routers: Vec<Router>,
    pub ext_links: Vec<ExtLink>,
    pub int_links: Vec<IntLink>,
    pub memory: NodeMemoryMap,
}

/// Build the network description for a validated configuration
pub fn generate_network_description(config: &Config) -> std::result::Result<NetworkDescription, ConfigurationError> {
    config.validate()?;

    let nodes = config.expand_nodes();
    info!(
        "Generating {} topology for {} nodes over {} CPUs",
        config.topology,
        nodes.len(),
        config.options.num_cpus
    );

    let graph = build_topology(config.topology, &nodes, &config.options)?;

    let torus_dims = match config.topology {
        TopologyKind::Torus3D => Some(resolve_dims(&config.options)?),
        _ => None,
    };

    let mut memory = NodeMemoryMap::new();
    register_topology(&config.options, &mut memory)?;

    Ok(NetworkDescription {
        topology: config.topology,
        torus_dims,
        nodes,
        routers: graph.routers,
        ext_links: graph.ext_links,
        int_links: graph.int_links,
        memory,
    })
}

/// Run the structural validator over a description
pub fn check_description(description: &NetworkDescription) -> Result<()> {
    let graph = crate::topology::Graph {
        routers: description.routers.clone(),
        ext_links: description.ext_links.clone(),
        int_links: description.int_links.clone(),
    };
    validate_graph(&graph, description.nodes.len()).wrap_err("Generated network failed structural validation")?;
    info!("Structural validation passed");
    Ok(())
}

/// Serialise a description to `path`
pub fn write_description(description: &NetworkDescription, path: &Path, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(description).wrap_err("Failed to serialize description to JSON")?,
        OutputFormat::Yaml => serde_yaml::to_string(description).wrap_err("Failed to serialize description to YAML")?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create output directory '{}'", parent.display()))?;
        }
    }
    fs::write(path, content).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;

    info!("Wrote network description to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkOptions;
    use crate::config::NodeSpec;
    use crate::topology::NodeType;
    use tempfile::tempdir;

    fn torus_config() -> Config {
        Config {
            topology: TopologyKind::Torus3D,
            options: NetworkOptions::new(8),
            nodes: vec![
                NodeSpec { node_type: NodeType::L1Cache, name: None, count: 8 },
                NodeSpec { node_type: NodeType::Dma, name: None, count: 1 },
            ],
        }
    }

    #[test]
    fn test_generate_description() {
        let description = generate_network_description(&torus_config()).unwrap();
        assert_eq!(description.torus_dims, Some(TorusDims::new(2, 2, 2)));
        assert_eq!(description.nodes.len(), 9);
        assert_eq!(description.ext_links.len(), 9);
        assert_eq!(description.int_links.len(), 48);
        assert_eq!(description.memory.entries.len(), 8);
        assert_eq!(description.ext_links[8].int_node, 0);
        check_description(&description).unwrap();
    }

    #[test]
    fn test_generate_description_propagates_errors() {
        let mut config = torus_config();
        config.options.num_cpus = 6;
        assert_eq!(
            generate_network_description(&config),
            Err(ConfigurationError::NotPerfectCube(6))
        );
    }

    #[test]
    fn test_write_json_and_yaml() {
        let description = generate_network_description(&torus_config()).unwrap();
        let dir = tempdir().unwrap();

        let json_path = dir.path().join("out/network.json");
        write_description(&description, &json_path, OutputFormat::Json).unwrap();
        let parsed: NetworkDescription = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed, description);

        let yaml_path = dir.path().join("network.yaml");
        write_description(&description, &yaml_path, OutputFormat::from_path(&yaml_path)).unwrap();
        let content = fs::read_to_string(&yaml_path).unwrap();
        assert!(content.contains("src_outport: PosX"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("YAML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("toml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::from_path(Path::new("x.txt")), OutputFormat::Json);
    }
}
