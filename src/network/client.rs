use std::time::Duration;

use serde::Deserialize;

use crate::core::Block;
use crate::error::{LedgerError, Result};

/// A peer's chain as reported by its `/get_chain` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Transport collaborator used by the reconciler to read peer chains.
///
/// Behind a trait so reconciliation can be exercised in tests without a
/// network, and so a failing peer surfaces as an ordinary `Transport` error
/// the reconciler can skip.
pub trait PeerClient {
    fn fetch_chain(&self, addr: &str) -> Result<PeerChain>;
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP implementation of [`PeerClient`] polling `GET http://{addr}/get_chain`.
pub struct HttpPeerClient {
    client: reqwest::blocking::Client,
}

impl HttpPeerClient {
    pub fn new() -> Result<HttpPeerClient> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(HttpPeerClient { client })
    }
}

impl PeerClient for HttpPeerClient {
    fn fetch_chain(&self, addr: &str) -> Result<PeerChain> {
        let url = format!("http://{addr}/get_chain");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(LedgerError::Transport(format!(
                "Peer {addr} responded with status {}",
                response.status()
            )));
        }
        let peer_chain: PeerChain = response.json()?;
        Ok(peer_chain)
    }
}
