use crate::contracts::ContractCall;
use crate::domain::{
    Clause, EmbeddedNotarization, EncodingMode, NotarizationRequest, TransactionComment,
    ValidRegistration,
};
use alloy_primitives::Address;
use chrono::{DateTime, Utc};

/// Output of the encoder: the clauses to submit together and how to present
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNotarization {
    pub clauses: Vec<Clause>,
    pub mode: EncodingMode,
    pub comment: TransactionComment,
}

/// Turns a digest and optional comment into exactly one of the two on-chain
/// representations.
///
/// The mode depends only on whether a notary contract is configured, so one
/// encoder never alternates between modes.
#[derive(Debug, Clone, Copy)]
pub struct NotarizationEncoder {
    contract: Option<Address>,
}

impl NotarizationEncoder {
    pub fn new(contract: Option<Address>) -> Self {
        Self { contract }
    }

    pub fn mode(&self) -> EncodingMode {
        match self.contract {
            Some(_) => EncodingMode::ContractEvent,
            None => EncodingMode::DataEmbed,
        }
    }

    pub fn encode(&self, request: &NotarizationRequest) -> EncodedNotarization {
        self.encode_at(request, Utc::now())
    }

    /// Same as [`encode`](Self::encode) with an explicit embed timestamp.
    pub fn encode_at(&self, request: &NotarizationRequest, at: DateTime<Utc>) -> EncodedNotarization {
        let comment = request.comment.as_deref();

        match self.contract {
            Some(contract) => {
                let call = ContractCall::NotarizeDocument {
                    document_hash: request.digest.to_hex(),
                    comment: comment.unwrap_or_default().to_string(),
                };
                tracing::debug!(function = call.function_name(), %contract, "encoding contract call");
                EncodedNotarization {
                    clauses: vec![Clause::call(contract, call.abi_encode())],
                    mode: EncodingMode::ContractEvent,
                    comment: TransactionComment::for_contract(comment, &request.digest),
                }
            }
            None => {
                let payload = EmbeddedNotarization::new(&request.digest, comment, at);
                EncodedNotarization {
                    clauses: vec![Clause::data_only(payload.to_bytes())],
                    mode: EncodingMode::DataEmbed,
                    comment: TransactionComment::for_data_embed(comment, &request.digest),
                }
            }
        }
    }
}

/// Encodes registry calls; one clause per document.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEncoder {
    contract: Address,
}

impl RegistryEncoder {
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    pub fn encode(&self, registration: &ValidRegistration) -> Clause {
        let call = ContractCall::RegisterDocument(registration.clone());
        Clause::call(self.contract, call.abi_encode())
    }

    /// N independent documents become N clauses of a single transaction.
    pub fn encode_batch(&self, registrations: &[ValidRegistration]) -> Vec<Clause> {
        registrations.iter().map(|r| self.encode(r)).collect()
    }

    pub fn comment(&self, count: usize) -> TransactionComment {
        if count == 1 {
            TransactionComment::new("Register document")
        } else {
            TransactionComment::new(format!("Register {} documents", count))
        }
    }
}
