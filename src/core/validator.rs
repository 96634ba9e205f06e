use crate::core::{Block, ProofOfWork};
use crate::error::Result;

/// Whole-chain validity check, used both on the local chain and on chains
/// received from peers during reconciliation.
pub struct ChainValidator;

impl ChainValidator {
    /// Walk the chain from position 1 and verify, for every adjacent pair,
    /// that the hash linkage holds and that the newer block's proof satisfies
    /// the proof-of-work predicate against its predecessor's proof.
    ///
    /// Returns false on the first violation. A chain holding only the genesis
    /// block is valid; an empty chain is not, since every chain carries the
    /// genesis block at position 0 by construction.
    pub fn is_valid(chain: &[Block]) -> Result<bool> {
        if chain.is_empty() {
            return Ok(false);
        }
        for pair in chain.windows(2) {
            let previous = &pair[0];
            let block = &pair[1];

            if block.get_previous_hash() != previous.hash()? {
                return Ok(false);
            }
            if !ProofOfWork::validate(previous.get_proof(), block.get_proof()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
