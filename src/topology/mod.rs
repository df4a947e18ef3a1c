//! Network topology module.
//!
//! This module generates the static router graph for each supported
//! topology family. Every strategy follows the same flow: pick a router
//! count, allocate routers, partition and attach endpoint nodes, then
//! wire routers together with topology-specific internal links.

pub mod types;
pub mod partition;
pub mod links;
pub mod butterfly;
pub mod ring;
pub mod torus;

use log::info;

use crate::config::{ConfigurationError, NetworkOptions};
use links::{allocate_routers, LinkBuilder};
use partition::{partition_nodes, PartitionStrategy};

// Re-export key types and functions for easier access
pub use butterfly::Butterfly;
pub use ring::Ring;
pub use torus::{resolve_dims, Torus3D};
pub use types::{ExtLink, Graph, IntLink, Node, NodeType, Router, TopologyKind, TorusDims};

/// The per-topology half of a build
pub trait TopologyBuilder {
    fn kind(&self) -> TopologyKind;

    /// Number of routers this topology instantiates
    fn num_routers(&self) -> usize;

    /// How endpoint nodes are spread over routers
    fn partition_strategy(&self) -> PartitionStrategy;

    /// Emit the router-to-router links
    fn build_internal_links(&self, links: &mut LinkBuilder);
}

/// Construct the strategy for `kind`, validating its router count
pub fn new_builder(
    kind: TopologyKind,
    options: &NetworkOptions,
) -> Result<Box<dyn TopologyBuilder>, ConfigurationError> {
    let builder: Box<dyn TopologyBuilder> = match kind {
        TopologyKind::Butterfly => Box::new(Butterfly::new(options)?),
        TopologyKind::Ring => Box::new(Ring::new(options)?),
        TopologyKind::Torus3D => Box::new(Torus3D::new(options)?),
    };
    Ok(builder)
}

/// Build the complete graph for `nodes` under topology `kind`
///
/// # Arguments
/// * `kind` - The topology family
/// * `nodes` - Endpoint nodes in attachment order
/// * `options` - Router count, latencies and optional torus dimensions
///
/// # Returns
/// * `Ok(Graph)` with routers, ext links and int links
/// * `Err(ConfigurationError)` naming the first violated invariant
pub fn build_topology(
    kind: TopologyKind,
    nodes: &[Node],
    options: &NetworkOptions,
) -> Result<Graph, ConfigurationError> {
    let builder = new_builder(kind, options)?;
    build_with(builder.as_ref(), nodes, options)
}

/// Run the shared build flow with an already constructed strategy
pub fn build_with(
    builder: &dyn TopologyBuilder,
    nodes: &[Node],
    options: &NetworkOptions,
) -> Result<Graph, ConfigurationError> {
    let num_routers = builder.num_routers();
    let routers = allocate_routers(num_routers, options.router_latency)?;
    let partition = partition_nodes(nodes, num_routers, builder.partition_strategy())?;

    let mut links = LinkBuilder::new(num_routers, options.link_latency)?;
    for (node, router) in partition.assignments.iter().enumerate() {
        links.ext_link(node, *router);
    }
    builder.build_internal_links(&mut links);

    info!(
        "Built {} topology: {} routers, {} ext links ({} overflow), {} int links",
        builder.kind(),
        num_routers,
        links.num_ext_links(),
        partition.overflow,
        links.num_int_links()
    );

    let (ext_links, int_links) = links.finish();
    Ok(Graph { routers, ext_links, int_links })
}
