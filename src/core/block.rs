use serde::{Deserialize, Serialize};

use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, sha256_hex};

/// Previous-hash value carried by the genesis block, which has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Proof value of the genesis block. It is fixed by construction and never
/// checked against the proof-of-work predicate.
pub const GENESIS_PROOF: u64 = 1;

// I keep the fields in name-sorted order on purpose: the canonical encoding a
// block is hashed over is its JSON form with sorted field names, and serde_json
// emits struct fields in declaration order. Blocks are immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    previous_hash: String,
    proof: u64,
    timestamp: String,
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new_block(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Result<Block> {
        Ok(Block {
            index,
            previous_hash,
            proof,
            timestamp: current_timestamp()?,
            transactions,
        })
    }

    /// Digest of the block's canonical encoding, hex-encoded lowercase.
    ///
    /// Deterministic: two blocks with identical field values always produce
    /// the same digest, regardless of how they were constructed.
    pub fn hash(&self) -> Result<String> {
        let encoded = serde_json::to_string(self)?;
        Ok(sha256_hex(encoded.as_bytes()))
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn get_timestamp(&self) -> &str {
        self.timestamp.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    /// Create a block with a fixed timestamp (for testing only)
    #[cfg(test)]
    pub fn new_test_block(
        index: u64,
        proof: u64,
        previous_hash: String,
        timestamp: String,
        transactions: Vec<Transaction>,
    ) -> Block {
        Block {
            index,
            previous_hash,
            proof,
            timestamp,
            transactions,
        }
    }
}
