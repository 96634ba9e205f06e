// This is the core ledger implementation - the heart of the node.
// The chain lives entirely in memory: every node rebuilds from genesis on
// startup and relies on reconciliation with peers to catch up.

use log::info;

use crate::core::{Block, ChainValidator, ProofOfWork, Transaction, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::error::Result;

/// The ledger owns exactly one chain and one pending-transaction buffer.
///
/// All mutation goes through `add_transaction`, `create_block` (which drains
/// the buffer exactly once per block) and `replace_chain`. Callers in a
/// concurrent runtime serialize these behind a single mutex per node.
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// A fresh ledger holds the genesis block and an empty buffer.
    pub fn new() -> Result<Ledger> {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.create_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string())?;
        Ok(ledger)
    }

    /// Seal the pending buffer into a new block and append it.
    ///
    /// The buffer is drained exactly once: the new block takes ownership of
    /// every transaction added since the previous block was created.
    pub fn create_block(&mut self, proof: u64, previous_hash: String) -> Result<Block> {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new_block(index, proof, previous_hash, transactions)?;
        self.chain.push(block.clone());
        Ok(block)
    }

    pub fn get_previous_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Chain always contains at least the genesis block")
    }

    /// Buffer a transaction and return the index of the block it is expected
    /// to land in. The returned index is a best-effort hint, not a
    /// commitment: reconciliation or interleaved mining can shift it.
    pub fn add_transaction(&mut self, transaction: Transaction) -> u64 {
        self.pending.push(transaction);
        self.chain.len() as u64 + 1
    }

    /// Mine the next block: search a proof against the previous block's
    /// proof, link back to its hash, and seal the pending buffer.
    ///
    /// Blocks the caller for the full duration of the proof search.
    pub fn mine(&mut self) -> Result<Block> {
        let previous_block = self.get_previous_block();
        let previous_proof = previous_block.get_proof();
        let previous_hash = previous_block.hash()?;

        info!(
            "Mining block {} with {} pending transaction(s)",
            self.chain.len() + 1,
            self.pending.len()
        );
        let proof = ProofOfWork::new(previous_proof).run();

        let block = self.create_block(proof, previous_hash)?;
        info!("Mined block {} with proof {}", block.get_index(), proof);
        Ok(block)
    }

    /// Validate this node's own chain.
    pub fn is_valid(&self) -> Result<bool> {
        ChainValidator::is_valid(&self.chain)
    }

    /// Swap in a replacement chain wholesale. The caller has already
    /// validated it; under the node's mutex the swap is all-or-nothing.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        info!(
            "Replacing local chain of length {} with chain of length {}",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pending.as_slice()
    }
}
