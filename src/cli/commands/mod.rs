//! CLI command implementations.

pub mod import;
pub mod inbox;
pub mod scan;
