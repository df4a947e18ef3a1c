//! Shared utilities: memory size parsing and graph validation.

pub mod memory_size;
pub mod validation;

pub use memory_size::parse_memory_size;
pub use validation::{validate_graph, GraphError};
