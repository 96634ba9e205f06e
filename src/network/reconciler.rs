use log::{info, warn};

use crate::core::{ChainValidator, Ledger};
use crate::error::Result;
use crate::network::client::PeerClient;
use crate::network::node::Nodes;

/// Longest-valid-chain reconciliation across registered peers.
pub struct Reconciler<C: PeerClient> {
    client: C,
}

impl<C: PeerClient> Reconciler<C> {
    pub fn new(client: C) -> Reconciler<C> {
        Reconciler { client }
    }

    /// Query every registered peer and adopt the longest chain that is both
    /// independently valid and strictly longer than the local chain.
    ///
    /// Returns true when the local chain was replaced. Unreachable or
    /// error-responding peers are skipped, never retried, never fatal, and a
    /// peer whose chain fails validation is simply not a better candidate.
    /// Peers are visited in registration order, so among equal-length longer
    /// chains the first registered peer wins.
    ///
    /// The caller holds the node's ledger lock for the whole pass, so the
    /// fetch-compare-swap sequence is a single atomic step from the point of
    /// view of every other ledger operation.
    pub fn reconcile(&self, ledger: &mut Ledger, nodes: &Nodes) -> Result<bool> {
        let mut max_length = ledger.len();
        let mut longest_chain = None;

        for node in nodes.get_nodes() {
            let addr = node.get_addr();
            let peer_chain = match self.client.fetch_chain(&addr) {
                Ok(peer_chain) => peer_chain,
                Err(e) => {
                    warn!("Skipping peer {addr}: {e}");
                    continue;
                }
            };

            // The advertised length is not trusted; only the delivered chain
            // counts. A peer over-reporting its length is just a peer whose
            // chain is not longer.
            let length = peer_chain.chain.len();
            if length != peer_chain.length {
                warn!(
                    "Peer {addr} advertised length {} but delivered {} block(s)",
                    peer_chain.length, length
                );
            }
            if length <= max_length {
                continue;
            }
            if !ChainValidator::is_valid(&peer_chain.chain)? {
                info!("Peer {addr} reported a longer but invalid chain, ignoring");
                continue;
            }

            max_length = length;
            longest_chain = Some(peer_chain.chain);
        }

        match longest_chain {
            Some(chain) => {
                ledger.replace_chain(chain);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
