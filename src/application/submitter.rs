use crate::domain::{Clause, TransactionComment};
use crate::infrastructure::transaction::{intrinsic_gas, TransactionBody, VM_INVOCATION_GAS};
use crate::infrastructure::{Ledger, LedgerError, TransactionSigner, WalletError};
use alloy_primitives::Address;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_EXPIRATION: u32 = 720;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Clause {index} reverted during estimation: {reason}")]
    Reverted { index: usize, reason: String },

    #[error("Nothing to submit")]
    EmptyBatch,
}

impl SubmissionError {
    /// Underlying message from the ledger, passed through to callers.
    pub fn details(&self) -> Option<String> {
        match self {
            SubmissionError::Ledger(e) => e.details().map(str::to_string),
            SubmissionError::Reverted { reason, .. } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Advisory gas figure from simulating the clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimate {
    /// Sum of the simulated per-clause gas.
    pub execution: u64,
    /// Gas limit put into the transaction body.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub id: String,
    pub gas: GasEstimate,
}

/// Signs and sends one transaction per call. No retries: the first ledger
/// rejection is returned as is.
#[derive(Clone)]
pub struct TransactionSubmitter {
    ledger: Arc<dyn Ledger>,
    expiration: u32,
    gas_price_coef: u8,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            expiration: DEFAULT_EXPIRATION,
            gas_price_coef: 0,
        }
    }

    pub fn with_expiration(mut self, blocks: u32) -> Self {
        self.expiration = blocks;
        self
    }

    pub fn with_gas_price_coef(mut self, coef: u8) -> Self {
        self.gas_price_coef = coef;
        self
    }

    /// Simulate the clauses as `caller` and derive a gas limit.
    ///
    /// Data-only transactions skip the simulation; intrinsic gas covers them.
    pub async fn estimate_gas(
        &self,
        clauses: &[Clause],
        caller: Option<&Address>,
    ) -> Result<GasEstimate, SubmissionError> {
        let intrinsic = intrinsic_gas(clauses);
        if !clauses.iter().any(Clause::is_contract_call) {
            return Ok(GasEstimate {
                execution: 0,
                total: intrinsic,
            });
        }

        let outcomes = self.ledger.inspect(clauses, caller).await?;
        let mut execution = 0u64;
        for (index, outcome) in outcomes.iter().enumerate() {
            if outcome.reverted {
                let reason = if outcome.vm_error.is_empty() {
                    "execution reverted".to_string()
                } else {
                    outcome.vm_error.clone()
                };
                return Err(SubmissionError::Reverted { index, reason });
            }
            execution = execution.saturating_add(outcome.gas_used);
        }

        Ok(GasEstimate {
            execution,
            total: intrinsic
                .saturating_add(execution)
                .saturating_add(VM_INVOCATION_GAS),
        })
    }

    pub async fn submit(
        &self,
        clauses: Vec<Clause>,
        comment: &TransactionComment,
        signer: &dyn TransactionSigner,
    ) -> Result<SubmittedTransaction, SubmissionError> {
        if clauses.is_empty() {
            return Err(SubmissionError::EmptyBatch);
        }

        let origin = signer.address();
        let gas = self.estimate_gas(&clauses, Some(&origin)).await?;
        let chain_tag = self.ledger.chain_tag().await?;
        let best = self.ledger.best_block().await?;
        let block_ref = TransactionBody::block_ref_from_id(&best.id).ok_or_else(|| {
            LedgerError::Malformed(format!("invalid block id {}", best.id))
        })?;

        let clause_count = clauses.len();
        let body = TransactionBody {
            chain_tag,
            block_ref,
            expiration: self.expiration,
            clauses,
            gas_price_coef: self.gas_price_coef,
            gas: gas.total,
            depends_on: None,
            nonce: rand::random(),
        };

        let signed = signer.sign(&body, comment).await?;
        let id = self.ledger.send(&signed).await?;

        tracing::info!(
            txid = %id,
            signer = signer.name(),
            clauses = clause_count,
            gas = gas.total,
            "transaction submitted"
        );

        Ok(SubmittedTransaction { id, gas })
    }
}
