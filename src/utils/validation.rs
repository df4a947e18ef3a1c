//! Structural validation of generated graphs.
//!
//! This module checks a built `Graph` against the invariants every
//! topology must hold: dense router ids, in-range endpoints, unique
//! increasing link ids, one attachment per node and reciprocal
//! internal links.

use std::collections::HashSet;

use crate::topology::types::Graph;

/// Structural defects found in a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("router at position {position} has id {id}; ids must be 0..N-1 in order")]
    RouterIdGap { position: usize, id: usize },

    #[error("link {link_id} references router {router} outside 0..{num_routers}")]
    RouterOutOfRange { link_id: usize, router: usize, num_routers: usize },

    #[error("link ids must be unique and increasing: {previous} followed by {next}")]
    LinkIdOrder { previous: usize, next: usize },

    #[error("ext link {link_id} attaches node {node} outside 0..{num_nodes}")]
    NodeOutOfRange { link_id: usize, node: usize, num_nodes: usize },

    #[error("node {node} has {count} ext links, expected exactly one")]
    NodeAttachment { node: usize, count: usize },

    #[error("router {router} uses output port {port} more than once")]
    DuplicateOutport { router: usize, port: String },

    #[error("link {link_id} ({src} --{outport}--> {dst}) has no reciprocal link")]
    MissingReciprocal { link_id: usize, src: usize, dst: usize, outport: String },

    #[error("link {link_id} has zero {field}")]
    ZeroValue { link_id: usize, field: &'static str },
}

/// Validate graph structure
///
/// # Arguments
/// * `graph` - The graph to validate
/// * `num_nodes` - Number of endpoint nodes the graph was built for
///
/// # Returns
/// * `Ok(())` if every check passes
/// * `Err(GraphError)` describing the first defect found
///
/// # Examples
/// ```
/// use nocgen::config::NetworkOptions;
/// use nocgen::topology::{build_topology, Node, NodeType, TopologyKind};
/// use nocgen::utils::validation::validate_graph;
///
/// let nodes: Vec<Node> = (0..4).map(|i| Node::new(format!("n{}", i), NodeType::L1Cache)).collect();
/// let graph = build_topology(TopologyKind::Ring, &nodes, &NetworkOptions::new(4)).unwrap();
/// assert!(validate_graph(&graph, nodes.len()).is_ok());
/// ```
pub fn validate_graph(graph: &Graph, num_nodes: usize) -> Result<(), GraphError> {
    let num_routers = graph.routers.len();

    for (position, router) in graph.routers.iter().enumerate() {
        if router.id != position {
            return Err(GraphError::RouterIdGap { position, id: router.id });
        }
    }

    // Link ids: ext links first, then int links, strictly increasing
    let ids = graph
        .ext_links
        .iter()
        .map(|l| l.link_id)
        .chain(graph.int_links.iter().map(|l| l.link_id));
    let mut previous: Option<usize> = None;
    for next in ids {
        if let Some(previous) = previous {
            if next <= previous {
                return Err(GraphError::LinkIdOrder { previous, next });
            }
        }
        previous = Some(next);
    }

    let mut attachments = vec![0usize; num_nodes];
    for link in &graph.ext_links {
        if link.int_node >= num_routers {
            return Err(GraphError::RouterOutOfRange { link_id: link.link_id, router: link.int_node, num_routers });
        }
        if link.latency == 0 {
            return Err(GraphError::ZeroValue { link_id: link.link_id, field: "latency" });
        }
        match attachments.get_mut(link.ext_node) {
            Some(count) => *count += 1,
            None => {
                return Err(GraphError::NodeOutOfRange {
                    link_id: link.link_id,
                    node: link.ext_node,
                    num_nodes,
                });
            }
        }
    }
    if let Some((node, count)) = attachments.iter().enumerate().find(|(_, c)| **c != 1) {
        return Err(GraphError::NodeAttachment { node, count: *count });
    }

    let mut outports = HashSet::new();
    // (src, dst, outport, inport) of every directed hop
    let mut hops: HashSet<(usize, usize, &str, &str)> = HashSet::new();
    for link in &graph.int_links {
        for router in [link.src, link.dst] {
            if router >= num_routers {
                return Err(GraphError::RouterOutOfRange { link_id: link.link_id, router, num_routers });
            }
        }
        if link.latency == 0 {
            return Err(GraphError::ZeroValue { link_id: link.link_id, field: "latency" });
        }
        if link.weight == 0 {
            return Err(GraphError::ZeroValue { link_id: link.link_id, field: "weight" });
        }
        if !outports.insert((link.src, link.src_outport.as_str())) {
            return Err(GraphError::DuplicateOutport { router: link.src, port: link.src_outport.clone() });
        }
        hops.insert((link.src, link.dst, link.src_outport.as_str(), link.dst_inport.as_str()));
    }

    for link in &graph.int_links {
        let reciprocal = (link.dst, link.src, link.dst_inport.as_str(), link.src_outport.as_str());
        if !hops.contains(&reciprocal) {
            return Err(GraphError::MissingReciprocal {
                link_id: link.link_id,
                src: link.src,
                dst: link.dst,
                outport: link.src_outport.clone(),
            });
        }
    }

    log::debug!(
        "Graph validated: {} routers, {} ext links, {} int links",
        num_routers,
        graph.ext_links.len(),
        graph.int_links.len()
    );

    Ok(())
}
