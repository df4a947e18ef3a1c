//! # nocgen - Interconnection network topology generator
//!
//! This library generates the static interconnection-network graph for a
//! multi-node compute simulator: given the endpoint controllers and a
//! topology family it produces routers, node-to-router external links and
//! router-to-router internal links annotated with latency and weight.
//!
//! ## Overview
//!
//! Three topology families are supported:
//!
//! - **Butterfly**: `log2(N)` stages, router `r` paired with `r ^ (1 << s)`;
//!   stage weights decrease with the stage index
//! - **Ring**: bidirectional cycle, uniform weight
//! - **Torus3D**: 3D wraparound mesh with dimension-ordered weights
//!   (X=1, Y=2, Z=3), explicit or perfect-cube dimensions
//!
//! Every build runs the same steps: allocate routers, partition the
//! endpoint nodes (overflow nodes must be DMA controllers and go to the
//! fallback router), emit ext links, then emit the topology's int links.
//! Link ids come from a counter local to the build, so repeated builds are
//! independent.
//!
//! ## Architecture
//!
//! - `config`: typed options, node list and `ConfigurationError`
//! - `config_loader`: YAML loading and CLI overrides
//! - `topology`: data model, partitioning, link emission and the three builders
//! - `routing`: port-direction routing helpers over generated graphs
//! - `registry`: per-node memory registration
//! - `utils`: memory size parsing and structural graph validation
//! - `orchestrator`: end-to-end generation of a network description
//!
//! ## Example Usage
//!
//! ```rust
//! use nocgen::config::NetworkOptions;
//! use nocgen::topology::{build_topology, Node, NodeType, TopologyKind};
//!
//! let nodes: Vec<Node> = (0..8)
//!     .map(|i| Node::new(format!("l1_cntrl{}", i), NodeType::L1Cache))
//!     .collect();
//! let graph = build_topology(TopologyKind::Torus3D, &nodes, &NetworkOptions::new(8))?;
//!
//! assert_eq!(graph.routers.len(), 8);
//! assert_eq!(graph.ext_links.len(), 8);
//! assert_eq!(graph.int_links.len(), 48);
//! # Ok::<(), nocgen::config::ConfigurationError>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! topology: Torus3D
//! options:
//!   num_cpus: 8
//!   mem_size: "512MiB"
//!   link_latency: 1
//!   router_latency: 1
//! nodes:
//!   - { type: L1Cache_Controller, count: 8 }
//!   - { type: DMA_Controller, count: 1 }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return typed `thiserror` errors; any invalid input
//! aborts the build with a `ConfigurationError` and no partial graph. The
//! binary and file-level helpers use `color_eyre` for context.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod routing;
pub mod registry;
pub mod utils;
pub mod orchestrator;
