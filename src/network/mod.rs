//! Peer networking functionality
//!
//! This module handles communication between ledger nodes: the manually
//! populated peer registry, the transport used to read peer chains, the
//! longest-valid-chain reconciler, and the HTTP surface of the node.

pub mod client;
pub mod node;
pub mod reconciler;
pub mod server;

pub use client::{HttpPeerClient, PeerChain, PeerClient};
pub use node::{Node, Nodes};
pub use reconciler::Reconciler;
pub use server::Server;
