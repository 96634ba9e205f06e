//! Utility functions and helpers
//!
//! This module contains the hashing and timestamp helpers
//! used throughout the ledger.

pub mod crypto;

pub use crypto::{current_timestamp, sha256_digest, sha256_hex};
