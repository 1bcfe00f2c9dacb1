use super::transaction::SignedTransaction;
use crate::domain::Clause;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Network error: {0}")]
    Network(#[from] hyper::Error),

    #[error("Invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("Node responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected node response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Malformed(String),
}

impl LedgerError {
    /// Body the node sent back with a rejection, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            LedgerError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub id: String,
    pub number: u64,
    #[serde(default)]
    pub gas_limit: u64,
    #[serde(default)]
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    /// Hex-encoded wei.
    pub balance: String,
    /// Hex-encoded VTHO wei.
    #[serde(default)]
    pub energy: String,
    #[serde(default)]
    pub has_code: bool,
}

impl AccountState {
    pub fn balance_wei(&self) -> Result<u128, LedgerError> {
        parse_hex_quantity(&self.balance)
    }

    pub fn energy_wei(&self) -> Result<u128, LedgerError> {
        parse_hex_quantity(&self.energy)
    }
}

fn parse_hex_quantity(value: &str) -> Result<u128, LedgerError> {
    let clean = value.trim_start_matches("0x");
    if clean.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(clean, 16)
        .map_err(|e| LedgerError::Malformed(format!("invalid quantity {}: {}", value, e)))
}

/// Clause in the node's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRecord {
    pub to: Option<String>,
    pub value: String,
    pub data: String,
}

impl From<&Clause> for ClauseRecord {
    fn from(clause: &Clause) -> Self {
        Self {
            to: clause.to.map(|a| format!("0x{}", hex::encode(a.as_slice()))),
            value: format!("0x{:x}", clause.value),
            data: format!("0x{}", hex::encode(&clause.data)),
        }
    }
}

impl ClauseRecord {
    pub fn data_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        decode_hex(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
}

impl EventLog {
    pub fn topic_words(&self) -> Vec<B256> {
        self.topics
            .iter()
            .filter_map(|t| decode_hex(t).ok())
            .filter(|b| b.len() == 32)
            .map(|b| B256::from_slice(&b))
            .collect()
    }

    pub fn data_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        decode_hex(&self.data)
    }
}

/// Result of simulating one clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseOutcome {
    pub data: String,
    #[serde(default)]
    pub events: Vec<EventLog>,
    pub gas_used: u64,
    pub reverted: bool,
    #[serde(default)]
    pub vm_error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub origin: String,
    pub clauses: Vec<ClauseRecord>,
    #[serde(default)]
    pub gas: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOutput {
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub events: Vec<EventLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub gas_used: u64,
    pub reverted: bool,
    #[serde(default)]
    pub outputs: Vec<ReceiptOutput>,
}

pub fn decode_hex(value: &str) -> Result<Vec<u8>, LedgerError> {
    let clean = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(clean).map_err(|e| LedgerError::Malformed(format!("invalid hex {}: {}", value, e)))
}

/// The external ledger, reduced to what notarization needs.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn best_block(&self) -> Result<BlockSummary, LedgerError>;

    /// Last byte of the genesis block id.
    async fn chain_tag(&self) -> Result<u8, LedgerError>;

    async fn account(&self, address: &Address) -> Result<AccountState, LedgerError>;

    /// Simulate clauses without committing them.
    async fn inspect(
        &self,
        clauses: &[Clause],
        caller: Option<&Address>,
    ) -> Result<Vec<ClauseOutcome>, LedgerError>;

    /// Returns the transaction id reported by the node.
    async fn send(&self, tx: &SignedTransaction) -> Result<String, LedgerError>;

    async fn transaction(&self, id: &str) -> Result<Option<TransactionRecord>, LedgerError>;

    async fn receipt(&self, id: &str) -> Result<Option<TransactionReceipt>, LedgerError>;
}
