//! Node partitioning across routers.
//!
//! This file divides the ordered endpoint list over the routers of a
//! topology. Nodes that do not divide evenly are overflow nodes; they
//! must be DMA controllers and are parked on the fallback router.

use log::debug;

use crate::config::ConfigurationError;
use crate::topology::types::Node;

/// Router that receives every overflow node
pub const FALLBACK_ROUTER: usize = 0;

/// How regular nodes are spread over routers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// Node `i` goes to router `i / per_router`; no overflow allowed
    Blocked,
    /// Node `i` goes to router `i % num_routers`; trailing overflow
    /// nodes go to the fallback router
    Interleaved,
}

/// Result of partitioning: the router assigned to each node, in node order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub assignments: Vec<usize>,
    pub per_router: usize,
    pub overflow: usize,
}

impl Partition {
    /// Number of nodes that divided evenly
    pub fn regular(&self) -> usize {
        self.assignments.len() - self.overflow
    }
}

/// Partition `nodes` over `num_routers` routers
///
/// # Arguments
/// * `nodes` - Endpoint nodes in attachment order
/// * `num_routers` - Router count of the topology
/// * `strategy` - Assignment rule for the evenly divisible nodes
///
/// # Returns
/// * `Ok(Partition)` with one router id per node
/// * `Err(ConfigurationError)` if the nodes cannot be placed
pub fn partition_nodes(
    nodes: &[Node],
    num_routers: usize,
    strategy: PartitionStrategy,
) -> Result<Partition, ConfigurationError> {
    if num_routers == 0 {
        return Err(ConfigurationError::NonPositive { field: "num_routers" });
    }

    let per_router = nodes.len() / num_routers;
    let overflow = nodes.len() % num_routers;
    debug!(
        "Partitioning {} nodes over {} routers: {} per router, {} overflow",
        nodes.len(),
        num_routers,
        per_router,
        overflow
    );

    let assignments = match strategy {
        PartitionStrategy::Blocked => {
            if overflow != 0 {
                return Err(ConfigurationError::NotDivisible {
                    nodes: nodes.len(),
                    routers: num_routers,
                });
            }
            (0..nodes.len()).map(|i| i / per_router).collect()
        }
        PartitionStrategy::Interleaved => {
            let regular = nodes.len() - overflow;
            let mut assignments: Vec<usize> = (0..regular).map(|i| i % num_routers).collect();

            for node in &nodes[regular..] {
                if !node.node_type.is_dma_capable() {
                    return Err(ConfigurationError::OverflowNotDma {
                        node: node.name.clone(),
                        node_type: node.node_type,
                    });
                }
                debug!("Attaching overflow node {} to router {}", node.name, FALLBACK_ROUTER);
                assignments.push(FALLBACK_ROUTER);
            }
            assignments
        }
    };

    Ok(Partition { assignments, per_router, overflow })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::NodeType;

    fn nodes(types: &[NodeType]) -> Vec<Node> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| Node::new(format!("n{}", i), *t))
            .collect()
    }

    #[test]
    fn test_blocked_groups_contiguous_nodes() {
        let nodes = nodes(&[NodeType::L1Cache; 8]);
        let partition = partition_nodes(&nodes, 4, PartitionStrategy::Blocked).unwrap();
        assert_eq!(partition.assignments, vec![0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(partition.per_router, 2);
        assert_eq!(partition.overflow, 0);
    }

    #[test]
    fn test_blocked_rejects_remainder() {
        let nodes = nodes(&[NodeType::Dma; 6]);
        assert_eq!(
            partition_nodes(&nodes, 4, PartitionStrategy::Blocked),
            Err(ConfigurationError::NotDivisible { nodes: 6, routers: 4 })
        );
    }

    #[test]
    fn test_interleaved_round_robin_with_dma_overflow() {
        let mut types = vec![NodeType::L1Cache; 4];
        types.extend([NodeType::Directory; 4]);
        types.extend([NodeType::Dma; 3]);
        let nodes = nodes(&types);

        let partition = partition_nodes(&nodes, 4, PartitionStrategy::Interleaved).unwrap();
        assert_eq!(partition.per_router, 2);
        assert_eq!(partition.overflow, 3);
        assert_eq!(partition.regular(), 8);
        assert_eq!(partition.assignments, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn test_interleaved_rejects_non_dma_overflow() {
        let nodes = nodes(&[NodeType::L1Cache, NodeType::L1Cache, NodeType::Directory]);
        let err = partition_nodes(&nodes, 2, PartitionStrategy::Interleaved).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::OverflowNotDma { node: "n2".to_string(), node_type: NodeType::Directory }
        );
    }

    #[test]
    fn test_fewer_nodes_than_routers_are_all_overflow() {
        let nodes = nodes(&[NodeType::Dma, NodeType::Dma]);
        let partition = partition_nodes(&nodes, 4, PartitionStrategy::Interleaved).unwrap();
        assert_eq!(partition.per_router, 0);
        assert_eq!(partition.assignments, vec![FALLBACK_ROUTER, FALLBACK_ROUTER]);
    }

    #[test]
    fn test_empty_node_list() {
        let partition = partition_nodes(&[], 4, PartitionStrategy::Blocked).unwrap();
        assert!(partition.assignments.is_empty());
    }
}
