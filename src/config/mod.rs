//! Configuration management
//!
//! This module handles basic configuration settings for the ledger node,
//! currently the network address it serves on.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
