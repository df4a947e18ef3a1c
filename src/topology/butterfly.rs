//! k-stage butterfly.
//!
//! Router `r` meets router `r ^ (1 << s)` at stage `s`. Each undirected
//! stage edge is emitted once, from the lower id, as an up/down pair.
//! Stage weights decrease with the stage index so the routing table
//! always prefers the highest remaining stage.

use crate::config::{ConfigurationError, NetworkOptions};
use crate::topology::links::LinkBuilder;
use crate::topology::partition::PartitionStrategy;
use crate::topology::types::TopologyKind;
use crate::topology::TopologyBuilder;

/// Weight of stage 0; stage `s` uses `BASE_WEIGHT - s`
pub const BASE_WEIGHT: u32 = 50;

pub fn up_port(stage: usize) -> String {
    format!("Up_s{}", stage)
}

pub fn down_port(stage: usize) -> String {
    format!("Down_s{}", stage)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Butterfly {
    num_routers: usize,
    stages: usize,
}

impl Butterfly {
    /// One router per CPU; the count must be an exact power of two
    pub fn new(options: &NetworkOptions) -> Result<Self, ConfigurationError> {
        let num_routers = options.num_cpus;
        if num_routers == 0 {
            return Err(ConfigurationError::NonPositive { field: "num_cpus" });
        }
        if !num_routers.is_power_of_two() {
            return Err(ConfigurationError::NotPowerOfTwo(num_routers));
        }
        let stages = num_routers.trailing_zeros() as usize;
        Ok(Self { num_routers, stages })
    }

    pub fn stages(&self) -> usize {
        self.stages
    }

    pub fn stage_weight(stage: usize) -> u32 {
        debug_assert!((stage as u32) < BASE_WEIGHT);
        BASE_WEIGHT - stage as u32
    }
}

impl TopologyBuilder for Butterfly {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Butterfly
    }

    fn num_routers(&self) -> usize {
        self.num_routers
    }

    fn partition_strategy(&self) -> PartitionStrategy {
        PartitionStrategy::Blocked
    }

    fn build_internal_links(&self, links: &mut LinkBuilder) {
        for stage in 0..self.stages {
            let weight = Self::stage_weight(stage);
            let up = up_port(stage);
            let down = down_port(stage);

            for r in 0..self.num_routers {
                let peer = r ^ (1 << stage);
                if r < peer {
                    links.int_link(r, peer, &up, &down, weight);
                    links.int_link(peer, r, &down, &up, weight);
                }
            }
        }
    }
}
