//! Core business logic modules.

pub mod executor;
pub mod naming;
pub mod scanner;
pub mod size_cache;
pub mod store;
pub mod workflow;
