//! Per-node memory registration.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigurationError, NetworkOptions};

/// Receiver of per-node memory ownership
pub trait MemoryRegistry {
    /// Record that `cpus` own `size` bytes at partition `position`
    fn register_node(&mut self, cpus: &[usize], size: u64, position: usize);
}

/// One registered node
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NodeMemoryEntry {
    pub cpus: Vec<usize>,
    pub size: u64,
    pub position: usize,
}

/// Registry that keeps every entry in registration order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct NodeMemoryMap {
    pub entries: Vec<NodeMemoryEntry>,
}

impl NodeMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte range `[start, end)` owned by the node at `position`, assuming
    /// partitions are laid out back to back in position order
    pub fn address_range(&self, position: usize) -> Option<(u64, u64)> {
        let mut start = 0u64;
        for entry in &self.entries {
            if entry.position == position {
                return Some((start, start + entry.size));
            }
            start += entry.size;
        }
        None
    }

    /// Sum of all registered shares
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

impl MemoryRegistry for NodeMemoryMap {
    fn register_node(&mut self, cpus: &[usize], size: u64, position: usize) {
        self.entries.push(NodeMemoryEntry { cpus: cpus.to_vec(), size, position });
    }
}

/// Register node `i` with `mem_size / num_cpus` bytes at position `i` for
/// every CPU. Integer division drops any remainder bytes.
pub fn register_topology(
    options: &NetworkOptions,
    registry: &mut dyn MemoryRegistry,
) -> Result<(), ConfigurationError> {
    if options.num_cpus == 0 {
        return Err(ConfigurationError::NonPositive { field: "num_cpus" });
    }
    let share = options.mem_bytes()? / options.num_cpus as u64;
    debug!("Registering {} nodes with {} bytes each", options.num_cpus, share);

    for i in 0..options.num_cpus {
        registry.register_node(&[i], share, i);
    }
    Ok(())
}
