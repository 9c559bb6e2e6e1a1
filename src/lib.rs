//! Shelf Library
//!
//! Keeps a disk-backup media archive and its catalog consistent: scanning the
//! encoded directory tree into titles and disks, and importing raw disk
//! backups into that layout.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
