use crate::infrastructure::{Ledger, LedgerError};
use alloy_primitives::Address;
use serde::Serialize;
use std::sync::Arc;

/// Gas for registering one document in its own transaction.
pub const SINGLE_DOCUMENT_GAS: u64 = 50_000;
/// Gas per document when registered as one clause of a batch.
pub const BATCH_DOCUMENT_GAS: u64 = 35_000;
/// VTHO per unit of gas, rough.
pub const VTHO_PER_GAS: f64 = 0.000_001;
/// Below this balance (in VET) the report warns.
pub const LOW_BALANCE_VET: f64 = 1.0;

const WEI_PER_VET: f64 = 1e18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCostEstimate {
    pub document_count: u64,
    pub per_document_gas: u64,
    pub total_gas: u64,
    pub savings_percent: u64,
}

/// `round((1 - batch/single) * 100)`.
pub fn savings_percent() -> u64 {
    let ratio = BATCH_DOCUMENT_GAS as f64 / SINGLE_DOCUMENT_GAS as f64;
    ((1.0 - ratio) * 100.0).round() as u64
}

pub fn estimate(document_count: u64) -> BatchCostEstimate {
    BatchCostEstimate {
        document_count,
        per_document_gas: BATCH_DOCUMENT_GAS,
        total_gas: BATCH_DOCUMENT_GAS.saturating_mul(document_count),
        savings_percent: savings_percent(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCost {
    pub gas_estimate: u64,
    #[serde(rename = "costInVTHO")]
    pub cost_in_vtho: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTable {
    pub single_document: OperationCost,
    pub batch_document: OperationCost,
}

pub fn cost_table() -> CostTable {
    CostTable {
        single_document: OperationCost {
            gas_estimate: SINGLE_DOCUMENT_GAS,
            cost_in_vtho: SINGLE_DOCUMENT_GAS as f64 * VTHO_PER_GAS,
            savings: None,
        },
        batch_document: OperationCost {
            gas_estimate: BATCH_DOCUMENT_GAS,
            cost_in_vtho: BATCH_DOCUMENT_GAS as f64 * VTHO_PER_GAS,
            savings: Some(format!("{}%", savings_percent())),
        },
    }
}

/// Advisory only; nothing here blocks a submission.
pub fn recommendations(balance_vet: f64) -> Vec<String> {
    let mut advice = Vec::new();
    if balance_vet < LOW_BALANCE_VET {
        advice.push("Low wallet balance - consider topping up".to_string());
    }
    advice.push("Use batch operations for multiple documents".to_string());
    advice.push("Monitor gas usage regularly".to_string());
    advice
}

pub fn network_name(node_url: &str) -> &'static str {
    if node_url.contains("testnet") {
        "testnet"
    } else {
        "mainnet"
    }
}

pub fn wei_to_vet(wei: u128) -> f64 {
    wei as f64 / WEI_PER_VET
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub address: Option<String>,
    #[serde(rename = "balanceVET")]
    pub balance_vet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub ok: bool,
    pub wallet: WalletSummary,
    pub network: &'static str,
    pub costs: CostTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchCostEstimate>,
    pub recommendations: Vec<String>,
}

/// Builds the cost monitor report: signer balance plus the fixed cost table.
pub struct CostMonitor {
    ledger: Arc<dyn Ledger>,
    node_url: String,
}

impl CostMonitor {
    pub fn new(ledger: Arc<dyn Ledger>, node_url: &str) -> Self {
        Self {
            ledger,
            node_url: node_url.to_string(),
        }
    }

    pub async fn report(
        &self,
        wallet: Option<Address>,
        documents: Option<u64>,
    ) -> Result<CostReport, LedgerError> {
        let balance = match wallet {
            Some(address) => wei_to_vet(self.ledger.account(&address).await?.balance_wei()?),
            None => 0.0,
        };

        if balance < LOW_BALANCE_VET {
            tracing::warn!(balance, "signer balance is low");
        }

        Ok(CostReport {
            ok: true,
            wallet: WalletSummary {
                address: wallet.map(|a| a.to_checksum(None)),
                balance_vet: format!("{:.4}", balance),
            },
            network: network_name(&self.node_url),
            costs: cost_table(),
            batch: documents.map(estimate),
            recommendations: recommendations(balance),
        })
    }
}
