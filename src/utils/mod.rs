//! Shared utilities: binary resolution and topology validation.

pub mod binary;
pub mod validation;

pub use binary::{resolve_binary_path, validate_binary, BinaryError};
pub use validation::{validate_node_name, validate_seed_address, validate_unique_nodes};
