use crate::contracts::decode_notarized_event;
use crate::domain::{DecodedNotarization, EmbeddedNotarization, EncodingMode};
use crate::infrastructure::ledger::{TransactionReceipt, TransactionRecord};
use crate::infrastructure::{Ledger, LedgerError};
use std::sync::Arc;
use thiserror::Error;

const JSON_OBJECT_START: u8 = 0x7b;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Invalid transaction id: must be 32 bytes (64 hex)")]
    InvalidTransactionId,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Recovers the notarization a settled transaction carries.
pub struct VerifyUseCase {
    ledger: Arc<dyn Ledger>,
}

impl VerifyUseCase {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// `Ok(None)` when the ledger knows no such transaction or has no receipt
    /// for it yet.
    pub async fn execute(
        &self,
        transaction_id: &str,
        hint: Option<EncodingMode>,
    ) -> Result<Option<DecodedNotarization>, VerifyError> {
        let id = normalize_transaction_id(transaction_id)?;

        let (tx, receipt) =
            tokio::try_join!(self.ledger.transaction(&id), self.ledger.receipt(&id))?;

        let (tx, receipt) = match (tx, receipt) {
            (Some(tx), Some(receipt)) => (tx, receipt),
            _ => {
                tracing::debug!(txid = %id, "transaction or receipt not found");
                return Ok(None);
            }
        };

        let decoded = decode_parts(&tx, &receipt, hint);
        match &decoded {
            DecodedNotarization::Raw { warning, .. } => {
                tracing::warn!(txid = %id, %warning, "could not decode notarization")
            }
            other => tracing::debug!(txid = %id, mode = ?other.mode(), "decoded notarization"),
        }
        Ok(Some(decoded))
    }
}

fn normalize_transaction_id(input: &str) -> Result<String, VerifyError> {
    let clean = input.trim();
    let clean = clean.strip_prefix("0x").unwrap_or(clean);
    if clean.len() != 64 || !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(VerifyError::InvalidTransactionId);
    }
    Ok(format!("0x{}", clean.to_ascii_lowercase()))
}

/// Decode a transaction body and its receipt.
///
/// The hinted mode is tried first. Without a hint the contract event path goes
/// first and the embedded JSON path is the fallback. When neither matches the
/// first clause payload is returned with a warning.
pub fn decode_parts(
    tx: &TransactionRecord,
    receipt: &TransactionReceipt,
    hint: Option<EncodingMode>,
) -> DecodedNotarization {
    let first = hint.unwrap_or(EncodingMode::ContractEvent);
    let order = [first, first.other()];

    order
        .iter()
        .find_map(|mode| match mode {
            EncodingMode::ContractEvent => from_events(receipt),
            EncodingMode::DataEmbed => from_payload(tx),
        })
        .unwrap_or_else(|| raw_fallback(tx))
}

fn from_events(receipt: &TransactionReceipt) -> Option<DecodedNotarization> {
    receipt
        .outputs
        .iter()
        .flat_map(|output| output.events.iter())
        .find_map(|event| {
            let data = event.data_bytes().ok()?;
            decode_notarized_event(&event.topic_words(), &data)
        })
        .map(|event| DecodedNotarization::ContractEvent {
            sender: event.sender,
            document_hash: event.document_hash,
            comment: event.comment,
        })
}

fn first_payload(tx: &TransactionRecord) -> Vec<u8> {
    tx.clauses
        .first()
        .and_then(|clause| clause.data_bytes().ok())
        .unwrap_or_default()
}

fn from_payload(tx: &TransactionRecord) -> Option<DecodedNotarization> {
    let payload = first_payload(tx);
    if payload.first() != Some(&JSON_OBJECT_START) {
        return None;
    }

    let embedded: EmbeddedNotarization = serde_json::from_slice(&payload).ok()?;
    Some(DecodedNotarization::DataEmbed {
        hash: embedded.h,
        comment: embedded.c,
        timestamp: embedded.t,
    })
}

fn raw_fallback(tx: &TransactionRecord) -> DecodedNotarization {
    let payload = first_payload(tx);
    let warning = match payload.first() {
        Some(&JSON_OBJECT_START) => match serde_json::from_slice::<EmbeddedNotarization>(&payload)
        {
            Err(e) => format!("payload looks like JSON but could not be parsed: {}", e),
            Ok(_) => "no notarization pattern matched".to_string(),
        },
        Some(_) => "payload is not a JSON object and no notarization event was found".to_string(),
        None => "transaction carries no payload".to_string(),
    };

    DecodedNotarization::Raw {
        data: format!("0x{}", hex::encode(payload)),
        warning,
    }
}
