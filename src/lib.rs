//! # Medichain - a minimal medical authorization ledger
//!
//! Each node keeps an append-only chain of blocks carrying medical-record
//! access-authorization entries, mines new blocks through a fixed-difficulty
//! proof-of-work puzzle, and reconciles divergent chains across manually
//! registered peers with a longest-valid-chain rule.
//!
//! ## How the code is organized
//! - `core/`: the ledger engine (blocks, transactions, mining, validation)
//! - `network/`: peer registry, chain reconciliation, HTTP surface
//! - `config/`: node configuration
//! - `error/`: error types shared across the crate
//! - `utils/`: hashing and timestamp helpers
//! - `cli/`: command-line interface of the node binary
//!
//! The chain is held entirely in memory: a node restart loses all state and
//! the node catches back up through peer reconciliation. There is no
//! transaction signing and no transaction-level validation beyond field
//! presence; peers are registered manually.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod utils;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, ChainValidator, Ledger, ProofOfWork, Transaction, TransactionPayload,
    GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
pub use error::{LedgerError, Result};
pub use network::{HttpPeerClient, Node, Nodes, PeerChain, PeerClient, Reconciler, Server};
pub use utils::{current_timestamp, sha256_digest, sha256_hex};
