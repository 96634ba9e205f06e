//! HTTP surface of the node.
//!
//! Routes mirror the operations the ledger exposes: mining, chain retrieval,
//! validation, transaction submission, peer registration and reconciliation.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{Block, Ledger, Transaction, TransactionPayload};
use crate::error::{LedgerError, Result};
use crate::network::client::HttpPeerClient;
use crate::network::node::Nodes;
use crate::network::reconciler::Reconciler;

/// Patient/doctor/permission values of the system-authored transaction
/// injected before every mined block. The patient is the node's own
/// generated identity.
const SYSTEM_DOCTOR: &str = "First doctor";
const SYSTEM_PERMISSION: i64 = 100;

/// Shared application state passed to the Axum handlers.
///
/// All ledger mutation is serialized behind the single mutex; the registry
/// carries its own lock. Mining and reconciliation block for their full
/// duration, so handlers run them on the blocking thread pool and take the
/// ledger lock inside the blocking task.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<Ledger>>,
    nodes: Arc<Nodes>,
    reconciler: Arc<Reconciler<HttpPeerClient>>,
    node_identity: String,
}

pub struct Server {
    state: AppState,
}

impl Server {
    /// `node_identity` is this node's generated identifier, credited as the
    /// patient of the system-authored transaction in every block it mines.
    pub fn new(node_identity: String) -> Result<Server> {
        Ok(Server {
            state: AppState {
                ledger: Arc::new(Mutex::new(Ledger::new()?)),
                nodes: Arc::new(Nodes::new()),
                reconciler: Arc::new(Reconciler::new(HttpPeerClient::new()?)),
                node_identity,
            },
        })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/mine_block", get(mine_block))
            .route("/get_chain", get(get_chain))
            .route("/is_valid", get(is_valid))
            .route("/add_transaction", post(add_transaction))
            .route("/connect_node", post(connect_node))
            .route("/replace_chain", get(replace_chain))
            .with_state(self.state.clone())
    }

    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| LedgerError::Io(format!("Failed to bind {addr}: {e}")))?;
        info!("Node listening on http://{addr}");
        axum::serve(listener, self.router())
            .await
            .map_err(|e| LedgerError::Io(format!("Server error: {e}")))
    }
}

type HandlerError = (StatusCode, String);

fn internal_error(err: LedgerError) -> HandlerError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn validation_error(err: LedgerError) -> HandlerError {
    match err {
        LedgerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        other => internal_error(other),
    }
}

fn join_error(err: tokio::task::JoinError) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Blocking task failed: {err}"),
    )
}

#[derive(Serialize)]
pub struct MineBlockResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: String,
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

/// GET /mine_block
async fn mine_block(
    State(state): State<AppState>,
) -> std::result::Result<Json<MineBlockResponse>, HandlerError> {
    let ledger = state.ledger.clone();
    let identity = state.node_identity.clone();

    // The proof search blocks for its full duration; run it off the async
    // runtime with the ledger lock held inside the blocking task.
    let block = tokio::task::spawn_blocking(move || -> Result<Block> {
        let mut guard = ledger.lock().expect("Ledger mutex poisoned");
        guard.add_transaction(Transaction::new(&identity, SYSTEM_DOCTOR, SYSTEM_PERMISSION));
        guard.mine()
    })
    .await
    .map_err(join_error)?
    .map_err(internal_error)?;

    Ok(Json(MineBlockResponse {
        message: "Mined a block successfully".to_string(),
        index: block.get_index(),
        timestamp: block.get_timestamp().to_string(),
        proof: block.get_proof(),
        previous_hash: block.get_previous_hash().to_string(),
        transactions: block.get_transactions().to_vec(),
    }))
}

#[derive(Serialize)]
pub struct GetChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// GET /get_chain
async fn get_chain(State(state): State<AppState>) -> Json<GetChainResponse> {
    let guard = state.ledger.lock().expect("Ledger mutex poisoned");
    Json(GetChainResponse {
        chain: guard.chain().to_vec(),
        length: guard.len(),
    })
}

#[derive(Serialize)]
pub struct IsValidResponse {
    pub is_valid: bool,
}

/// GET /is_valid
async fn is_valid(
    State(state): State<AppState>,
) -> std::result::Result<Json<IsValidResponse>, HandlerError> {
    let guard = state.ledger.lock().expect("Ledger mutex poisoned");
    let is_valid = guard.is_valid().map_err(internal_error)?;
    Ok(Json(IsValidResponse { is_valid }))
}

#[derive(Serialize)]
pub struct AddTransactionResponse {
    pub message: String,
}

/// POST /add_transaction
///
/// The payload goes through the explicit parse-and-validate step; a missing
/// field is a 400 and leaves the pending buffer untouched.
async fn add_transaction(
    State(state): State<AppState>,
    Json(payload): Json<TransactionPayload>,
) -> std::result::Result<(StatusCode, Json<AddTransactionResponse>), HandlerError> {
    let transaction = payload.into_transaction().map_err(validation_error)?;

    let mut guard = state.ledger.lock().expect("Ledger mutex poisoned");
    let index = guard.add_transaction(transaction);

    Ok((
        StatusCode::CREATED,
        Json(AddTransactionResponse {
            message: format!("This transaction will be added to Block {index}"),
        }),
    ))
}

#[derive(Deserialize)]
pub struct ConnectNodeRequest {
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ConnectNodeResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

/// POST /connect_node
async fn connect_node(
    State(state): State<AppState>,
    Json(payload): Json<ConnectNodeRequest>,
) -> std::result::Result<(StatusCode, Json<ConnectNodeResponse>), HandlerError> {
    let addresses = payload.nodes.ok_or_else(|| {
        validation_error(LedgerError::Validation(
            "Missing node list in registration payload".to_string(),
        ))
    })?;

    for address in &addresses {
        state.nodes.register(address).map_err(validation_error)?;
    }

    Ok((
        StatusCode::CREATED,
        Json(ConnectNodeResponse {
            message: "All nodes are now connected".to_string(),
            total_nodes: state.nodes.get_addrs(),
        }),
    ))
}

#[derive(Serialize)]
pub struct ReplaceChainResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/// GET /replace_chain
async fn replace_chain(
    State(state): State<AppState>,
) -> std::result::Result<Json<ReplaceChainResponse>, HandlerError> {
    let ledger = state.ledger.clone();
    let nodes = state.nodes.clone();
    let reconciler = state.reconciler.clone();

    // One blocking network call per peer; the ledger lock is held across the
    // pass so the compare-and-swap is atomic with respect to mining.
    let (replaced, chain) = tokio::task::spawn_blocking(move || -> Result<(bool, Vec<Block>)> {
        let mut guard = ledger.lock().expect("Ledger mutex poisoned");
        let replaced = reconciler.reconcile(&mut guard, &nodes)?;
        Ok((replaced, guard.chain().to_vec()))
    })
    .await
    .map_err(join_error)?
    .map_err(internal_error)?;

    let message = if replaced {
        "The chain was replaced by the longest valid chain".to_string()
    } else {
        "The local chain is already the longest".to_string()
    };

    Ok(Json(ReplaceChainResponse {
        message,
        replaced,
        chain,
    }))
}
