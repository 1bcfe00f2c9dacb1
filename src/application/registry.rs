use super::encoder::RegistryEncoder;
use super::submitter::{SubmissionError, TransactionSubmitter};
use crate::contracts::{decode_document_info, document_info_call};
use crate::domain::{
    Clause, DigestError, DocumentDigest, DocumentInfo, DocumentRegistration, RegistrationError,
    ValidRegistration,
};
use crate::infrastructure::ledger::decode_hex;
use crate::infrastructure::{Ledger, LedgerError, WalletProviders};
use alloy_primitives::Address;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("CONTRACT_ADDRESS missing")]
    ContractNotConfigured,

    #[error("documents array required")]
    EmptyBatch,

    #[error("Each document needs hash, reference, metadataURI")]
    IncompleteDocument { index: usize },

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("getDocumentInfo reverted: {0}")]
    LookupReverted(String),

    #[error("{0}")]
    Decode(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRegistration {
    pub txid: String,
    pub documents_count: usize,
    pub estimated_gas: u64,
    pub gas_per_document: u64,
}

/// Register documents in, and read them back from, the registry contract.
pub struct RegistryUseCase {
    ledger: Arc<dyn Ledger>,
    submitter: TransactionSubmitter,
    contract: Option<Address>,
}

impl RegistryUseCase {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        submitter: TransactionSubmitter,
        contract: Option<Address>,
    ) -> Self {
        Self {
            ledger,
            submitter,
            contract,
        }
    }

    fn encoder(&self) -> Result<RegistryEncoder, RegistryError> {
        self.contract
            .map(RegistryEncoder::new)
            .ok_or(RegistryError::ContractNotConfigured)
    }

    pub async fn lookup(&self, hash: &str) -> Result<DocumentInfo, RegistryError> {
        let contract = self.contract.ok_or(RegistryError::ContractNotConfigured)?;
        let digest = DocumentDigest::parse(hash)?;

        let clause = Clause::call(contract, document_info_call(digest.to_b256()));
        let outcomes = self.ledger.inspect(&[clause], None).await?;
        let outcome = outcomes
            .first()
            .ok_or_else(|| LedgerError::Malformed("empty inspection result".to_string()))?;

        if outcome.reverted {
            return Err(RegistryError::LookupReverted(outcome.vm_error.clone()));
        }

        let output = decode_hex(&outcome.data)?;
        decode_document_info(digest.to_hex(), &output).map_err(RegistryError::Decode)
    }

    pub async fn register(
        &self,
        registration: &DocumentRegistration,
        providers: &WalletProviders,
    ) -> Result<String, RegistryError> {
        let document = registration.validate()?;
        let encoder = self.encoder()?;
        let signer = providers.select().map_err(SubmissionError::from)?;

        let sent = self
            .submitter
            .submit(vec![encoder.encode(&document)], &encoder.comment(1), signer.as_ref())
            .await?;

        tracing::info!(txid = %sent.id, digest = %document.digest.short(), "document registered");
        Ok(sent.id)
    }

    /// Every document is validated before any clause is built; one invalid
    /// entry rejects the whole batch.
    pub async fn batch_register(
        &self,
        documents: &[DocumentRegistration],
        providers: &WalletProviders,
    ) -> Result<BatchRegistration, RegistryError> {
        let documents = validate_batch(documents)?;
        let encoder = self.encoder()?;
        let signer = providers.select().map_err(SubmissionError::from)?;

        let clauses = encoder.encode_batch(&documents);
        let count = documents.len();
        let sent = self
            .submitter
            .submit(clauses, &encoder.comment(count), signer.as_ref())
            .await?;

        let estimated_gas = sent.gas.execution;
        tracing::info!(
            txid = %sent.id,
            documents = count,
            estimated_gas,
            "batch registered"
        );

        Ok(BatchRegistration {
            txid: sent.id,
            documents_count: count,
            estimated_gas,
            gas_per_document: per_document(estimated_gas, count),
        })
    }
}

pub fn validate_batch(
    documents: &[DocumentRegistration],
) -> Result<Vec<ValidRegistration>, RegistryError> {
    if documents.is_empty() {
        return Err(RegistryError::EmptyBatch);
    }

    documents
        .iter()
        .enumerate()
        .map(|(index, doc)| match doc.validate() {
            Err(RegistrationError::MissingFields) => {
                Err(RegistryError::IncompleteDocument { index })
            }
            other => other.map_err(RegistryError::from),
        })
        .collect()
}

/// `round(total / count)`, halves rounded up.
fn per_document(total: u64, count: usize) -> u64 {
    let count = count.max(1) as u64;
    (total + count / 2) / count
}
