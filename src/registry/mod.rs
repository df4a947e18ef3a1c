//! # Memory Registration Module
//!
//! After a topology is built, every simulated CPU is advertised to the
//! memory-configuration collaborator together with its share of the
//! total memory. The share is a flat, equal, non-overlapping split of
//! `mem_size` over `num_cpus`; no topology-specific logic applies.
//!
//! ## Key Components
//!
//! - `MemoryRegistry`: the seam through which registrations leave the crate
//! - `NodeMemoryMap`: an in-crate registry that records each entry and is
//!   written into the generated network description
//! - `register_topology`: performs the registration for a set of options

pub mod memory;

pub use memory::{register_topology, MemoryRegistry, NodeMemoryEntry, NodeMemoryMap};
