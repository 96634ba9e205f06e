use std::sync::RwLock;

use crate::error::{LedgerError, Result};

/// A registered peer, stored as its `host:port` component only.
#[derive(Clone)]
pub struct Node {
    addr: String,
}

impl Node {
    fn new(addr: String) -> Node {
        Node { addr }
    }

    pub fn get_addr(&self) -> String {
        self.addr.clone()
    }
}

/// Registry of known peers.
///
/// Backed by an insertion-ordered Vec rather than a set so reconciliation
/// iterates peers in registration order and its tie-break is deterministic.
/// The registry only grows; peers are never evicted automatically.
pub struct Nodes {
    inner: RwLock<Vec<Node>>,
}

impl Default for Nodes {
    fn default() -> Self {
        Self::new()
    }
}

impl Nodes {
    pub fn new() -> Nodes {
        Nodes {
            inner: RwLock::new(vec![]),
        }
    }

    /// Register a peer from a URL-like address string, keeping only the
    /// `host:port` component. Duplicates are ignored.
    pub fn register(&self, address: &str) -> Result<()> {
        let netloc = parse_netloc(address)?;
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on nodes - this should never happen");
        if !inner.iter().any(|x| x.get_addr().eq(netloc.as_str())) {
            inner.push(Node::new(netloc));
        }
        Ok(())
    }

    pub fn get_nodes(&self) -> Vec<Node> {
        self.inner
            .read()
            .expect("Failed to acquire read lock on nodes - this should never happen")
            .to_vec()
    }

    pub fn get_addrs(&self) -> Vec<String> {
        self.get_nodes().iter().map(|n| n.get_addr()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("Failed to acquire read lock on nodes - this should never happen")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .expect("Failed to acquire read lock on nodes - this should never happen")
            .is_empty()
    }

    pub fn node_is_known(&self, addr: &str) -> bool {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on nodes - this should never happen");
        inner.iter().any(|x| x.get_addr().eq(addr))
    }
}

/// Extract the `host:port` component from a URL-like address, discarding
/// scheme, path, query and fragment.
fn parse_netloc(address: &str) -> Result<String> {
    let rest = match address.split_once("://") {
        Some((_, rest)) => rest,
        None => address,
    };
    let netloc = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if netloc.is_empty() {
        return Err(LedgerError::Validation(format!(
            "Invalid node address: {address}"
        )));
    }
    Ok(netloc.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_strips_scheme_and_path() {
        let nodes = Nodes::new();
        nodes.register("http://127.0.0.1:5001/").unwrap();
        assert_eq!(nodes.get_addrs(), vec!["127.0.0.1:5001".to_string()]);
    }

    #[test]
    fn test_register_accepts_bare_host_port() {
        let nodes = Nodes::new();
        nodes.register("127.0.0.1:5001").unwrap();
        assert!(nodes.node_is_known("127.0.0.1:5001"));
    }

    #[test]
    fn test_register_discards_query_and_fragment() {
        let nodes = Nodes::new();
        nodes.register("http://127.0.0.1:5001?x=1#top").unwrap();
        assert_eq!(nodes.get_addrs(), vec!["127.0.0.1:5001".to_string()]);
    }

    #[test]
    fn test_register_deduplicates() {
        let nodes = Nodes::new();
        nodes.register("http://127.0.0.1:5001/").unwrap();
        nodes.register("127.0.0.1:5001").unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let nodes = Nodes::new();
        nodes.register("http://127.0.0.1:5003/").unwrap();
        nodes.register("http://127.0.0.1:5001/").unwrap();
        nodes.register("http://127.0.0.1:5002/").unwrap();
        assert_eq!(
            nodes.get_addrs(),
            vec![
                "127.0.0.1:5003".to_string(),
                "127.0.0.1:5001".to_string(),
                "127.0.0.1:5002".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_address_is_rejected() {
        let nodes = Nodes::new();
        assert!(matches!(
            nodes.register("http:///path"),
            Err(LedgerError::Validation(_))
        ));
        assert!(nodes.is_empty());
    }
}
