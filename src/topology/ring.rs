//! Bidirectional ring.

use crate::config::{ConfigurationError, NetworkOptions};
use crate::topology::links::LinkBuilder;
use crate::topology::partition::PartitionStrategy;
use crate::topology::types::TopologyKind;
use crate::topology::TopologyBuilder;

pub const CLOCKWISE: &str = "Clockwise";
pub const COUNTER_CLOCKWISE: &str = "CounterClockwise";

/// Every ring link carries the same weight
pub const RING_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    num_routers: usize,
}

impl Ring {
    pub fn new(options: &NetworkOptions) -> Result<Self, ConfigurationError> {
        if options.num_cpus < 2 {
            return Err(ConfigurationError::TooFewRouters {
                topology: TopologyKind::Ring,
                required: 2,
                found: options.num_cpus,
            });
        }
        Ok(Self { num_routers: options.num_cpus })
    }

    pub fn next(&self, router: usize) -> usize {
        (router + 1) % self.num_routers
    }

    pub fn prev(&self, router: usize) -> usize {
        (router + self.num_routers - 1) % self.num_routers
    }
}

impl TopologyBuilder for Ring {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Ring
    }

    fn num_routers(&self) -> usize {
        self.num_routers
    }

    fn partition_strategy(&self) -> PartitionStrategy {
        PartitionStrategy::Interleaved
    }

    fn build_internal_links(&self, links: &mut LinkBuilder) {
        for i in 0..self.num_routers {
            links.int_link(i, self.next(i), CLOCKWISE, COUNTER_CLOCKWISE, RING_WEIGHT);
            links.int_link(i, self.prev(i), COUNTER_CLOCKWISE, CLOCKWISE, RING_WEIGHT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_requires_two_routers() {
        assert_eq!(
            Ring::new(&NetworkOptions::new(1)),
            Err(ConfigurationError::TooFewRouters { topology: TopologyKind::Ring, required: 2, found: 1 })
        );
    }

    #[test]
    fn test_clockwise_chain_is_closed_cycle() {
        let n = 5;
        let ring = Ring::new(&NetworkOptions::new(n)).unwrap();
        let mut links = LinkBuilder::new(n, 1).unwrap();
        ring.build_internal_links(&mut links);
        let (_, int_links) = links.finish();
        assert_eq!(int_links.len(), 2 * n);

        let mut visited = vec![false; n];
        let mut current = 0;
        for _ in 0..n {
            visited[current] = true;
            let hop = int_links
                .iter()
                .find(|l| l.src == current && l.src_outport == CLOCKWISE)
                .unwrap();
            assert_eq!(hop.dst_inport, COUNTER_CLOCKWISE);
            current = hop.dst;
        }
        assert_eq!(current, 0);
        assert!(visited.iter().all(|v| *v));
    }

    #[test]
    fn test_two_router_ring() {
        let ring = Ring::new(&NetworkOptions::new(2)).unwrap();
        assert_eq!(ring.next(0), 1);
        assert_eq!(ring.prev(0), 1);
        let mut links = LinkBuilder::new(2, 1).unwrap();
        ring.build_internal_links(&mut links);
        assert_eq!(links.num_int_links(), 4);
    }
}
