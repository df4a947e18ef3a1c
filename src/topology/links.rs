//! Router allocation and link emission.
//!
//! `LinkBuilder` owns the link-id counter for a single build. Ids are
//! handed out in emission order, so ext links come first and internal
//! links follow without gaps.

use crate::config::ConfigurationError;
use crate::topology::types::{ExtLink, IntLink, Router};

/// Create `num_routers` routers with ids `0..num_routers`
pub fn allocate_routers(num_routers: usize, latency: u32) -> Result<Vec<Router>, ConfigurationError> {
    if num_routers == 0 {
        return Err(ConfigurationError::NonPositive { field: "num_routers" });
    }
    if latency == 0 {
        return Err(ConfigurationError::NonPositive { field: "router_latency" });
    }
    Ok((0..num_routers).map(|id| Router { id, latency }).collect())
}

/// Emits links with fresh ids and a shared link latency
#[derive(Debug)]
pub struct LinkBuilder {
    next_id: usize,
    latency: u32,
    num_routers: usize,
    ext_links: Vec<ExtLink>,
    int_links: Vec<IntLink>,
}

impl LinkBuilder {
    pub fn new(num_routers: usize, latency: u32) -> Result<Self, ConfigurationError> {
        if latency == 0 {
            return Err(ConfigurationError::NonPositive { field: "link_latency" });
        }
        Ok(Self {
            next_id: 0,
            latency,
            num_routers,
            ext_links: Vec::new(),
            int_links: Vec::new(),
        })
    }

    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Attach node `node` to `router`
    pub fn ext_link(&mut self, node: usize, router: usize) {
        debug_assert!(router < self.num_routers);
        let link_id = self.fresh_id();
        self.ext_links.push(ExtLink {
            link_id,
            ext_node: node,
            int_node: router,
            latency: self.latency,
        });
    }

    /// One directed hop `src -> dst` leaving through `outport`
    pub fn int_link(&mut self, src: usize, dst: usize, outport: &str, inport: &str, weight: u32) {
        debug_assert!(src < self.num_routers && dst < self.num_routers);
        let link_id = self.fresh_id();
        self.int_links.push(IntLink {
            link_id,
            src,
            dst,
            src_outport: outport.to_string(),
            dst_inport: inport.to_string(),
            latency: self.latency,
            weight,
        });
    }

    pub fn num_ext_links(&self) -> usize {
        self.ext_links.len()
    }

    pub fn num_int_links(&self) -> usize {
        self.int_links.len()
    }

    /// Hand over the emitted links
    pub fn finish(self) -> (Vec<ExtLink>, Vec<IntLink>) {
        (self.ext_links, self.int_links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_routers() {
        let routers = allocate_routers(3, 2).unwrap();
        assert_eq!(
            routers,
            vec![
                Router { id: 0, latency: 2 },
                Router { id: 1, latency: 2 },
                Router { id: 2, latency: 2 },
            ]
        );
        assert!(allocate_routers(0, 1).is_err());
        assert_eq!(
            allocate_routers(4, 0),
            Err(ConfigurationError::NonPositive { field: "router_latency" })
        );
    }

    #[test]
    fn test_link_ids_are_sequential_across_kinds() {
        let mut links = LinkBuilder::new(2, 5).unwrap();
        links.ext_link(0, 0);
        links.ext_link(1, 1);
        links.int_link(0, 1, "East", "West", 1);
        links.int_link(1, 0, "West", "East", 1);
        let (ext, int) = links.finish();

        let ids: Vec<usize> = ext.iter().map(|l| l.link_id).chain(int.iter().map(|l| l.link_id)).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(int.iter().all(|l| l.latency == 5));
        assert_eq!(int[1].src_outport, "West");
    }

    #[test]
    fn test_zero_link_latency_rejected() {
        assert_eq!(
            LinkBuilder::new(4, 0).unwrap_err(),
            ConfigurationError::NonPositive { field: "link_latency" }
        );
    }
}
