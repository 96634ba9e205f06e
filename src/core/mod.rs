//! Core ledger functionality
//!
//! This module contains the fundamental ledger components including
//! blocks, transactions, chain validation, and proof-of-work consensus.

pub mod block;
pub mod ledger;
pub mod proof_of_work;
pub mod transaction;
pub mod validator;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use ledger::Ledger;
pub use proof_of_work::ProofOfWork;
pub use transaction::{Transaction, TransactionPayload};
pub use validator::ChainValidator;
