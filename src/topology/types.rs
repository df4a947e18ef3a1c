//! Topology type definitions.
//!
//! This file contains the data model shared by every topology strategy:
//! endpoint nodes, routers, external/internal links and the assembled
//! graph handed to the simulator's network object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigurationError;

/// Topology families supported by the generator
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    /// k-stage butterfly, routers paired by bit-XOR per stage
    Butterfly,
    /// Bidirectional ring
    Ring,
    /// 3D k-ary n-cube with wraparound links
    Torus3D,
}

impl TopologyKind {
    /// Name used in logs and in the generated description
    pub fn name(&self) -> &'static str {
        match self {
            Self::Butterfly => "Butterfly",
            Self::Ring => "Ring",
            Self::Torus3D => "Torus3D",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TopologyKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "butterfly" => Ok(Self::Butterfly),
            "ring" => Ok(Self::Ring),
            "torus3d" | "torus" => Ok(Self::Torus3D),
            _ => Err(ConfigurationError::UnknownTopology(s.to_string())),
        }
    }
}

/// Controller type of an endpoint node
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    #[serde(rename = "L1Cache_Controller")]
    L1Cache,
    #[serde(rename = "L2Cache_Controller")]
    L2Cache,
    #[serde(rename = "Directory_Controller")]
    Directory,
    #[serde(rename = "Memory_Controller")]
    Memory,
    #[serde(rename = "DMA_Controller")]
    Dma,
}

impl NodeType {
    /// Only DMA controllers may be parked on the fallback router
    pub fn is_dma_capable(&self) -> bool {
        matches!(self, Self::Dma)
    }

    /// Prefix for generated node names (`l1_cntrl0`, `dma_cntrl1`, ...)
    pub fn name_prefix(&self) -> &'static str {
        match self {
            Self::L1Cache => "l1_cntrl",
            Self::L2Cache => "l2_cntrl",
            Self::Directory => "dir_cntrl",
            Self::Memory => "mem_cntrl",
            Self::Dma => "dma_cntrl",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::L1Cache => "L1Cache_Controller",
            Self::L2Cache => "L2Cache_Controller",
            Self::Directory => "Directory_Controller",
            Self::Memory => "Memory_Controller",
            Self::Dma => "DMA_Controller",
        };
        f.write_str(tag)
    }
}

/// An endpoint attached to the network. Owned by the caller; links refer
/// to it by its index in the node slice passed to the builder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl Node {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self { name: name.into(), node_type }
    }
}

/// A switching element with a fixed per-hop latency
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    pub id: usize,
    pub latency: u32,
}

/// Attachment of one endpoint node to one router
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExtLink {
    pub link_id: usize,
    /// Index of the node in the caller's node list
    pub ext_node: usize,
    /// Router id
    pub int_node: usize,
    pub latency: u32,
}

/// One directed router-to-router hop
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IntLink {
    pub link_id: usize,
    pub src: usize,
    pub dst: usize,
    pub src_outport: String,
    pub dst_inport: String,
    pub latency: u32,
    pub weight: u32,
}

/// Torus dimensions with row-major (X fastest) router numbering
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TorusDims {
    pub kx: usize,
    pub ky: usize,
    pub kz: usize,
}

impl TorusDims {
    pub fn new(kx: usize, ky: usize, kz: usize) -> Self {
        Self { kx, ky, kz }
    }

    pub fn num_routers(&self) -> usize {
        self.kx * self.ky * self.kz
    }

    /// `id(x, y, z) = x + y*kx + z*kx*ky`
    pub fn coord_to_id(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.kx + z * self.kx * self.ky
    }

    pub fn id_to_coord(&self, id: usize) -> (usize, usize, usize) {
        (id % self.kx, (id / self.kx) % self.ky, id / (self.kx * self.ky))
    }

    /// Sizes in X, Y, Z order
    pub fn sides(&self) -> [usize; 3] {
        [self.kx, self.ky, self.kz]
    }
}

impl fmt::Display for TorusDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.kx, self.ky, self.kz)
    }
}

/// The generated network: routers plus the links that connect them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    pub routers: Vec<Router>,
    pub ext_links: Vec<ExtLink>,
    pub int_links: Vec<IntLink>,
}

impl Graph {
    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }

    /// The internal link leaving `router` through output port `port`
    pub fn out_port(&self, router: usize, port: &str) -> Option<&IntLink> {
        self.int_links
            .iter()
            .find(|link| link.src == router && link.src_outport == port)
    }

    /// All internal links leaving `router`
    pub fn links_from(&self, router: usize) -> impl Iterator<Item = &IntLink> {
        self.int_links.iter().filter(move |link| link.src == router)
    }

    /// Ext links attached to `router`
    pub fn attached_nodes(&self, router: usize) -> Vec<usize> {
        self.ext_links
            .iter()
            .filter(|link| link.int_node == router)
            .map(|link| link.ext_node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_kind_parsing() {
        assert_eq!("ring".parse::<TopologyKind>().unwrap(), TopologyKind::Ring);
        assert_eq!("Butterfly".parse::<TopologyKind>().unwrap(), TopologyKind::Butterfly);
        assert_eq!("TORUS3D".parse::<TopologyKind>().unwrap(), TopologyKind::Torus3D);
        assert!(matches!(
            "mesh".parse::<TopologyKind>(),
            Err(ConfigurationError::UnknownTopology(_))
        ));
    }

    #[test]
    fn test_node_type_serde_names() {
        let node: Node = serde_yaml::from_str("name: dma0\ntype: DMA_Controller\n").unwrap();
        assert_eq!(node.node_type, NodeType::Dma);
        assert!(node.node_type.is_dma_capable());
        assert!(!NodeType::L1Cache.is_dma_capable());
        assert_eq!(NodeType::Directory.to_string(), "Directory_Controller");
    }

    #[test]
    fn test_coord_mapping_is_bijection() {
        let dims = TorusDims::new(3, 2, 4);
        let mut seen = vec![false; dims.num_routers()];
        for z in 0..4 {
            for y in 0..2 {
                for x in 0..3 {
                    let id = dims.coord_to_id(x, y, z);
                    assert!(!seen[id], "id {} produced twice", id);
                    seen[id] = true;
                    assert_eq!(dims.id_to_coord(id), (x, y, z));
                }
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}
