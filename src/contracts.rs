//! The two contract interfaces the service talks to.
//!
//! The registry (`registerDocument`) and the notary (`notarizeDocument`) record
//! the same fact with different argument shapes. They stay separate.

use crate::domain::{DocumentInfo, ValidRegistration};
use alloy_primitives::{B256, U256};
use alloy_sol_types::{sol, SolCall, SolEvent};

sol! {
    #[allow(missing_docs)]
    interface DocumentRegistry {
        function registerDocument(bytes32 hash, string reference, string metadataURI) external;
        function getDocumentInfo(bytes32 hash) external view returns (address owner, uint256 timestamp, string metadataURI, uint256 voteCount, bool exists);
    }
}

sol! {
    #[allow(missing_docs)]
    interface DocumentNotary {
        function notarizeDocument(string documentHash, string comment) external;
        event DocumentNotarized(address sender, string documentHash, string comment);
    }
}

/// A state-changing call against one of the two interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    RegisterDocument(ValidRegistration),
    NotarizeDocument { document_hash: String, comment: String },
}

impl ContractCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::RegisterDocument(_) => "registerDocument",
            ContractCall::NotarizeDocument { .. } => "notarizeDocument",
        }
    }

    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            ContractCall::RegisterDocument(reg) => DocumentRegistry::registerDocumentCall {
                hash: reg.digest.to_b256(),
                reference: reg.reference.clone(),
                metadataURI: reg.metadata_uri.clone(),
            }
            .abi_encode(),
            ContractCall::NotarizeDocument {
                document_hash,
                comment,
            } => DocumentNotary::notarizeDocumentCall {
                documentHash: document_hash.clone(),
                comment: comment.clone(),
            }
            .abi_encode(),
        }
    }
}

/// Decoded fields of a `DocumentNotarized` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotarizedEvent {
    pub sender: String,
    pub document_hash: String,
    pub comment: String,
}

pub fn notarized_event_topic() -> B256 {
    DocumentNotary::DocumentNotarized::SIGNATURE_HASH
}

/// Decode a raw log if it is a `DocumentNotarized` event.
pub fn decode_notarized_event(topics: &[B256], data: &[u8]) -> Option<NotarizedEvent> {
    if topics.first() != Some(&notarized_event_topic()) {
        return None;
    }

    let event =
        DocumentNotary::DocumentNotarized::decode_raw_log(topics.iter().copied(), data, false)
            .ok()?;

    Some(NotarizedEvent {
        sender: format!("0x{}", hex::encode(event.sender.as_slice())),
        document_hash: event.documentHash,
        comment: event.comment,
    })
}

pub fn document_info_call(hash: B256) -> Vec<u8> {
    DocumentRegistry::getDocumentInfoCall { hash }.abi_encode()
}

pub fn decode_document_info(hash: String, output: &[u8]) -> Result<DocumentInfo, String> {
    let decoded = DocumentRegistry::getDocumentInfoCall::abi_decode_returns(output, false)
        .map_err(|e| format!("failed to decode getDocumentInfo output: {}", e))?;

    Ok(DocumentInfo {
        hash,
        owner: format!("0x{}", hex::encode(decoded.owner.as_slice())),
        timestamp: clamp_u64(decoded.timestamp).saturating_mul(1000),
        metadata_uri: decoded.metadataURI,
        vote_count: clamp_u64(decoded.voteCount),
        exists: decoded.exists,
    })
}

fn clamp_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
