use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::topology::types::{Node, NodeType, TopologyKind};
use crate::utils::memory_size::parse_memory_size;

/// Errors that abort a topology build. Every variant names the invariant
/// that failed; no partial graph is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("controller count {nodes} not divisible by router count {routers}")]
    NotDivisible { nodes: usize, routers: usize },

    #[error("overflow node {node} is a {node_type}, only DMA controllers may attach to the fallback router")]
    OverflowNotDma { node: String, node_type: NodeType },

    #[error("butterfly router count {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("router count {0} is not a perfect cube; provide torus_kx/torus_ky/torus_kz")]
    NotPerfectCube(usize),

    #[error("torus_kx * torus_ky * torus_kz ({kx}x{ky}x{kz}) must equal router count {routers}")]
    DimensionMismatch { kx: usize, ky: usize, kz: usize, routers: usize },

    #[error("torus_kx, torus_ky and torus_kz must be given together")]
    PartialDimensions,

    #[error("{topology} topology requires at least {required} routers, got {found}")]
    TooFewRouters { topology: TopologyKind, required: usize, found: usize },

    #[error("invalid mem_size: {0}")]
    InvalidMemorySize(String),

    #[error("node names cannot be empty")]
    EmptyNodeName,

    #[error("unknown topology '{0}' (expected Butterfly, Ring or Torus3D)")]
    UnknownTopology(String),
}

/// Memory size as written in the configuration: raw bytes or a size string
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum MemSize {
    Bytes(u64),
    Text(String),
}

impl MemSize {
    pub fn to_bytes(&self) -> Result<u64, ConfigurationError> {
        match self {
            Self::Bytes(bytes) => Ok(*bytes),
            Self::Text(text) => parse_memory_size(text).map_err(ConfigurationError::InvalidMemorySize),
        }
    }
}

impl Default for MemSize {
    fn default() -> Self {
        Self::Text("512MiB".to_string())
    }
}

fn default_latency() -> u32 {
    1
}

fn default_count() -> u32 {
    1
}

/// Options recognised by the topology builders
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkOptions {
    /// Router count driver; one router per simulated CPU
    pub num_cpus: usize,
    #[serde(default)]
    pub mem_size: MemSize,
    #[serde(default = "default_latency")]
    pub link_latency: u32,
    #[serde(default = "default_latency")]
    pub router_latency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torus_kx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torus_ky: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torus_kz: Option<usize>,
}

impl NetworkOptions {
    /// Options for `num_cpus` routers with unit latencies and default memory
    pub fn new(num_cpus: usize) -> Self {
        Self {
            num_cpus,
            mem_size: MemSize::default(),
            link_latency: default_latency(),
            router_latency: default_latency(),
            torus_kx: None,
            torus_ky: None,
            torus_kz: None,
        }
    }

    pub fn with_torus_dims(mut self, kx: usize, ky: usize, kz: usize) -> Self {
        self.torus_kx = Some(kx);
        self.torus_ky = Some(ky);
        self.torus_kz = Some(kz);
        self
    }

    pub fn with_mem_size(mut self, mem_size: MemSize) -> Self {
        self.mem_size = mem_size;
        self
    }

    /// Total memory in bytes
    pub fn mem_bytes(&self) -> Result<u64, ConfigurationError> {
        self.mem_size.to_bytes()
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.num_cpus == 0 {
            return Err(ConfigurationError::NonPositive { field: "num_cpus" });
        }
        if self.link_latency == 0 {
            return Err(ConfigurationError::NonPositive { field: "link_latency" });
        }
        if self.router_latency == 0 {
            return Err(ConfigurationError::NonPositive { field: "router_latency" });
        }
        for (field, value) in [
            ("torus_kx", self.torus_kx),
            ("torus_ky", self.torus_ky),
            ("torus_kz", self.torus_kz),
        ] {
            if value == Some(0) {
                return Err(ConfigurationError::NonPositive { field });
            }
        }
        self.mem_bytes()?;
        Ok(())
    }
}

/// One entry of the node list; expands to `count` nodes of the same type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

/// Top-level configuration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub topology: TopologyKind,
    pub options: NetworkOptions,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.options.validate()?;

        for spec in &self.nodes {
            if let Some(name) = &spec.name {
                if name.trim().is_empty() {
                    return Err(ConfigurationError::EmptyNodeName);
                }
            }
        }

        Ok(())
    }

    /// Expand the node list in order.
    ///
    /// Unnamed entries get `<prefix><n>` names where `n` counts nodes of
    /// that type; a named entry with `count > 1` gets its index appended.
    pub fn expand_nodes(&self) -> Vec<Node> {
        let mut per_type: HashMap<NodeType, usize> = HashMap::new();
        let mut nodes = Vec::new();

        for spec in &self.nodes {
            for i in 0..spec.count {
                let index = per_type.entry(spec.node_type).or_insert(0);
                let name = match &spec.name {
                    Some(name) if spec.count == 1 => name.clone(),
                    Some(name) => format!("{}{}", name, i),
                    None => format!("{}{}", spec.node_type.name_prefix(), index),
                };
                *index += 1;
                nodes.push(Node::new(name, spec.node_type));
            }
        }

        nodes
    }
}
