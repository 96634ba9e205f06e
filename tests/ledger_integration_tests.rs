//! Ledger integration tests
//!
//! Exercises the public surface of the crate end to end: mining, chain
//! validation, transaction buffering and peer reconciliation.

use medichain::{
    Block, ChainValidator, Ledger, LedgerError, Nodes, PeerChain, PeerClient, ProofOfWork,
    Reconciler, Result, Transaction, TransactionPayload,
};
use std::collections::HashMap;

const SYSTEM_DOCTOR: &str = "First doctor";

fn mine_with_system_tx(ledger: &mut Ledger, identity: &str) -> Block {
    ledger.add_transaction(Transaction::new(identity, SYSTEM_DOCTOR, 100));
    ledger.mine().unwrap()
}

#[test]
fn test_fresh_node_mines_a_valid_three_block_chain() {
    let mut ledger = Ledger::new().unwrap();

    mine_with_system_tx(&mut ledger, "node-a");
    mine_with_system_tx(&mut ledger, "node-a");

    // Genesis plus two mined blocks.
    assert_eq!(ledger.len(), 3);
    assert!(ledger.is_valid().unwrap());

    let chain = ledger.chain();
    for pair in chain.windows(2) {
        assert_eq!(pair[1].get_previous_hash(), pair[0].hash().unwrap());
    }

    // Every mined block carries exactly the system-authored transaction.
    for block in &chain[1..] {
        assert_eq!(block.get_transactions().len(), 1);
        assert_eq!(block.get_transactions()[0].get_doctor(), SYSTEM_DOCTOR);
    }
}

#[test]
fn test_every_mined_proof_satisfies_the_difficulty_predicate() {
    let mut ledger = Ledger::new().unwrap();
    ledger.mine().unwrap();
    ledger.mine().unwrap();

    let chain = ledger.chain();
    for pair in chain.windows(2) {
        assert!(ProofOfWork::validate(
            pair[0].get_proof(),
            pair[1].get_proof()
        ));
    }
}

#[test]
fn test_buffer_is_consumed_exactly_once() {
    let mut ledger = Ledger::new().unwrap();
    let tx = Transaction::new("patient-1", "Dr. Ray", 7);
    let predicted = ledger.add_transaction(tx.clone());
    assert_eq!(predicted, 2);

    let block = ledger.mine().unwrap();
    assert_eq!(block.get_index(), predicted);
    assert_eq!(block.get_transactions(), &[tx]);
    assert!(ledger.pending_transactions().is_empty());

    // The next block starts from an empty buffer.
    let next = ledger.mine().unwrap();
    assert!(next.get_transactions().is_empty());
}

#[test]
fn test_payload_missing_permission_leaves_buffer_unchanged() {
    let mut ledger = Ledger::new().unwrap();

    let payload = TransactionPayload {
        patient: Some("patient-1".to_string()),
        doctor: Some("Dr. Ray".to_string()),
        permission: None,
    };
    let result = payload.into_transaction();
    assert!(matches!(result, Err(LedgerError::Validation(_))));
    assert!(ledger.pending_transactions().is_empty());

    // A complete payload goes through.
    let payload = TransactionPayload {
        patient: Some("patient-1".to_string()),
        doctor: Some("Dr. Ray".to_string()),
        permission: Some(1),
    };
    ledger.add_transaction(payload.into_transaction().unwrap());
    assert_eq!(ledger.pending_transactions().len(), 1);
}

/// Tamper with one serialized field of a block by rebuilding it from JSON.
fn tampered(block: &Block, field: &str, value: serde_json::Value) -> Block {
    let mut json = serde_json::to_value(block).unwrap();
    json[field] = value;
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_tampered_chain_fails_validation() {
    let mut ledger = Ledger::new().unwrap();
    ledger.mine().unwrap();
    ledger.mine().unwrap();

    let mut with_bad_hash = ledger.chain().to_vec();
    with_bad_hash[2] = tampered(
        &with_bad_hash[2],
        "previous_hash",
        serde_json::json!("0".repeat(64)),
    );
    assert!(!ChainValidator::is_valid(&with_bad_hash).unwrap());

    let mut with_bad_proof = ledger.chain().to_vec();
    let proof = with_bad_proof[1].get_proof();
    with_bad_proof[1] = tampered(&with_bad_proof[1], "proof", serde_json::json!(proof + 1));
    assert!(!ChainValidator::is_valid(&with_bad_proof).unwrap());

    // Extreme proof values deserialize fine and must be rejected, not
    // overflow the proof arithmetic.
    let mut with_huge_proof = ledger.chain().to_vec();
    with_huge_proof[2] = tampered(&with_huge_proof[2], "proof", serde_json::json!(u64::MAX));
    assert!(!ChainValidator::is_valid(&with_huge_proof).unwrap());
}

/// In-memory transport standing in for peer HTTP endpoints.
struct StubClient {
    responses: HashMap<String, PeerChain>,
}

impl StubClient {
    fn from_chains(chains: HashMap<String, Vec<Block>>) -> StubClient {
        let responses = chains
            .into_iter()
            .map(|(addr, chain)| {
                let length = chain.len();
                (addr, PeerChain { chain, length })
            })
            .collect();
        StubClient { responses }
    }
}

impl PeerClient for StubClient {
    fn fetch_chain(&self, addr: &str) -> Result<PeerChain> {
        match self.responses.get(addr) {
            Some(response) => Ok(PeerChain {
                chain: response.chain.clone(),
                length: response.length,
            }),
            None => Err(LedgerError::Transport(format!("Peer {addr} unreachable"))),
        }
    }
}

#[test]
fn test_reconciliation_adopts_the_longest_valid_peer_chain() {
    // Local chain of length 3, peers reporting lengths 5 and 4.
    let mut ledger = Ledger::new().unwrap();
    mine_with_system_tx(&mut ledger, "node-a");
    mine_with_system_tx(&mut ledger, "node-a");

    let mut long_peer = Ledger::new().unwrap();
    for _ in 0..4 {
        mine_with_system_tx(&mut long_peer, "node-b");
    }
    let mut short_peer = Ledger::new().unwrap();
    for _ in 0..3 {
        mine_with_system_tx(&mut short_peer, "node-c");
    }

    let mut chains = HashMap::new();
    chains.insert("127.0.0.1:5003".to_string(), short_peer.chain().to_vec());
    chains.insert("127.0.0.1:5004".to_string(), long_peer.chain().to_vec());

    let nodes = Nodes::new();
    nodes.register("http://127.0.0.1:5003/").unwrap();
    nodes.register("http://127.0.0.1:5004/").unwrap();

    let reconciler = Reconciler::new(StubClient::from_chains(chains));
    let replaced = reconciler.reconcile(&mut ledger, &nodes).unwrap();

    assert!(replaced);
    assert_eq!(ledger.len(), 5);
    assert_eq!(ledger.chain(), long_peer.chain());
    assert!(ledger.is_valid().unwrap());
}

#[test]
fn test_reconciliation_ignores_longer_invalid_chain_and_shorter_peers() {
    let mut ledger = Ledger::new().unwrap();
    mine_with_system_tx(&mut ledger, "node-a");
    let original = ledger.chain().to_vec();

    // A peer advertising length 6 whose chain is internally inconsistent.
    let mut forger = Ledger::new().unwrap();
    for _ in 0..5 {
        mine_with_system_tx(&mut forger, "node-x");
    }
    let mut forged = forger.chain().to_vec();
    forged[3] = tampered(&forged[3], "previous_hash", serde_json::json!("0".repeat(64)));

    // Another peer that is simply not longer than the local chain.
    let same_length = Ledger::new().unwrap();

    let mut chains = HashMap::new();
    chains.insert("127.0.0.1:5003".to_string(), forged);
    chains.insert("127.0.0.1:5004".to_string(), same_length.chain().to_vec());

    let nodes = Nodes::new();
    nodes.register("http://127.0.0.1:5003/").unwrap();
    nodes.register("http://127.0.0.1:5004/").unwrap();
    nodes.register("http://127.0.0.1:5005/").unwrap(); // unreachable

    let reconciler = Reconciler::new(StubClient::from_chains(chains));
    let replaced = reconciler.reconcile(&mut ledger, &nodes).unwrap();

    assert!(!replaced);
    assert_eq!(ledger.chain(), original.as_slice());
}

#[test]
fn test_peer_overstating_its_length_cannot_poison_the_node() {
    // A peer delivering an empty chain while claiming length 10 must not be
    // adopted, and the node must keep mining normally afterwards.
    let mut ledger = Ledger::new().unwrap();
    mine_with_system_tx(&mut ledger, "node-a");
    let original = ledger.chain().to_vec();

    let mut responses = HashMap::new();
    responses.insert(
        "127.0.0.1:5003".to_string(),
        PeerChain {
            chain: vec![],
            length: 10,
        },
    );
    let client = StubClient { responses };

    let nodes = Nodes::new();
    nodes.register("http://127.0.0.1:5003/").unwrap();

    let replaced = Reconciler::new(client).reconcile(&mut ledger, &nodes).unwrap();
    assert!(!replaced);
    assert_eq!(ledger.chain(), original.as_slice());

    mine_with_system_tx(&mut ledger, "node-a");
    assert_eq!(ledger.len(), 3);
    assert!(ledger.is_valid().unwrap());
}
