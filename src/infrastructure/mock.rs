use super::ledger::{
    AccountState, BlockSummary, ClauseOutcome, ClauseRecord, EventLog, Ledger, LedgerError,
    ReceiptOutput, TransactionReceipt, TransactionRecord,
};
use super::transaction::SignedTransaction;
use crate::contracts::DocumentNotary;
use crate::domain::Clause;
use alloy_primitives::Address;
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const DEFAULT_CLAUSE_GAS: u64 = 30_000;

#[derive(Default)]
struct State {
    transactions: HashMap<String, (TransactionRecord, TransactionReceipt)>,
    sent: Vec<SignedTransaction>,
    balances: HashMap<Address, u128>,
    call_outputs: HashMap<[u8; 4], Vec<u8>>,
    reject_with: Option<String>,
}

/// In-memory ledger for development and tests.
///
/// Stores every transaction it is sent and behaves like a deployed notary
/// contract: `notarizeDocument` calls produce a `DocumentNotarized` event in
/// the receipt.
#[derive(Clone)]
pub struct MockLedger {
    chain_tag: u8,
    clause_gas: u64,
    state: Arc<Mutex<State>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            chain_tag: 0x27,
            clause_gas: DEFAULT_CLAUSE_GAS,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Gas every simulated clause reports.
    pub fn with_clause_gas(mut self, gas: u64) -> Self {
        self.clause_gas = gas;
        self
    }

    pub fn set_balance(&self, address: Address, wei: u128) {
        self.lock().balances.insert(address, wei);
    }

    /// Canned output for read-only calls starting with `selector`.
    pub fn set_call_output(&self, selector: [u8; 4], output: Vec<u8>) {
        self.lock().call_outputs.insert(selector, output);
    }

    /// Make every following `send` fail with this node message.
    pub fn reject_transactions(&self, message: &str) {
        self.lock().reject_with = Some(message.to_string());
    }

    pub fn insert_transaction(&self, record: TransactionRecord, receipt: TransactionReceipt) {
        self.lock()
            .transactions
            .insert(record.id.clone(), (record, receipt));
    }

    pub fn sent(&self) -> Vec<SignedTransaction> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn receipt_for(tx: &SignedTransaction) -> TransactionReceipt {
        let outputs = tx
            .body
            .clauses
            .iter()
            .map(|clause| {
                let events = clause
                    .to
                    .and_then(|to| {
                        let call =
                            DocumentNotary::notarizeDocumentCall::abi_decode(&clause.data, false)
                                .ok()?;
                        let event = DocumentNotary::DocumentNotarized {
                            sender: tx.origin,
                            documentHash: call.documentHash,
                            comment: call.comment,
                        };
                        Some(EventLog {
                            address: format!("0x{}", hex::encode(to.as_slice())),
                            topics: vec![format!(
                                "0x{}",
                                hex::encode(DocumentNotary::DocumentNotarized::SIGNATURE_HASH)
                            )],
                            data: format!("0x{}", hex::encode(event.encode_data())),
                        })
                    })
                    .into_iter()
                    .collect();
                ReceiptOutput {
                    contract_address: None,
                    events,
                }
            })
            .collect();

        TransactionReceipt {
            gas_used: tx.body.gas,
            reverted: false,
            outputs,
        }
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn best_block(&self) -> Result<BlockSummary, LedgerError> {
        Ok(BlockSummary {
            id: format!("0x{:016x}{}", 100u64 << 32, "00".repeat(24)),
            number: 100,
            gas_limit: 40_000_000,
            timestamp: 1_700_000_000,
        })
    }

    async fn chain_tag(&self) -> Result<u8, LedgerError> {
        Ok(self.chain_tag)
    }

    async fn account(&self, address: &Address) -> Result<AccountState, LedgerError> {
        let balance = self.lock().balances.get(address).copied().unwrap_or(0);
        Ok(AccountState {
            balance: format!("0x{:x}", balance),
            energy: "0x0".to_string(),
            has_code: false,
        })
    }

    async fn inspect(
        &self,
        clauses: &[Clause],
        _caller: Option<&Address>,
    ) -> Result<Vec<ClauseOutcome>, LedgerError> {
        let state = self.lock();
        Ok(clauses
            .iter()
            .map(|clause| {
                let output = clause
                    .data
                    .get(..4)
                    .and_then(|s| <[u8; 4]>::try_from(s).ok())
                    .and_then(|selector| state.call_outputs.get(&selector).cloned())
                    .unwrap_or_default();
                ClauseOutcome {
                    data: format!("0x{}", hex::encode(output)),
                    events: vec![],
                    gas_used: self.clause_gas,
                    reverted: false,
                    vm_error: String::new(),
                }
            })
            .collect())
    }

    async fn send(&self, tx: &SignedTransaction) -> Result<String, LedgerError> {
        let mut state = self.lock();
        if let Some(message) = &state.reject_with {
            return Err(LedgerError::Status {
                status: 400,
                body: message.clone(),
            });
        }

        let id = tx.id();
        let record = TransactionRecord {
            id: id.clone(),
            origin: format!("0x{}", hex::encode(tx.origin.as_slice())),
            clauses: tx.body.clauses.iter().map(ClauseRecord::from).collect(),
            gas: tx.body.gas,
        };
        state
            .transactions
            .insert(id.clone(), (record, Self::receipt_for(tx)));
        state.sent.push(tx.clone());
        Ok(id)
    }

    async fn transaction(&self, id: &str) -> Result<Option<TransactionRecord>, LedgerError> {
        Ok(self.lock().transactions.get(id).map(|(tx, _)| tx.clone()))
    }

    async fn receipt(&self, id: &str) -> Result<Option<TransactionReceipt>, LedgerError> {
        Ok(self.lock().transactions.get(id).map(|(_, r)| r.clone()))
    }
}
