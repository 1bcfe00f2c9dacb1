use super::transaction::{SignedTransaction, TransactionBody};
use crate::domain::TransactionComment;
use alloy_primitives::{keccak256, Address};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Signer address {derived} does not match configured address {configured}")]
    AddressMismatch { derived: Address, configured: Address },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("No wallet available to sign")]
    NoProvider,
}

/// Holder of an account that can authorize transactions.
///
/// Implementations never hand out key material; they only return signatures.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    fn name(&self) -> &str;

    fn address(&self) -> Address;

    fn is_available(&self) -> bool {
        true
    }

    /// Sign a transaction body. The comment is display metadata for the key
    /// holder and is not covered by the signature.
    async fn sign(
        &self,
        body: &TransactionBody,
        comment: &TransactionComment,
    ) -> Result<SignedTransaction, WalletError>;
}

/// Signs with a secp256k1 key held in process memory.
pub struct LocalKeySigner {
    name: String,
    key: SigningKey,
    address: Address,
}

impl LocalKeySigner {
    pub fn from_hex(name: &str, private_key: &str) -> Result<Self, WalletError> {
        let clean = private_key.trim().trim_start_matches("0x");
        let bytes = hex::decode(clean).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let key =
            SigningKey::from_slice(&bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let address = address_of(&key);

        Ok(Self {
            name: name.to_string(),
            key,
            address,
        })
    }

    /// Reject the key if it does not belong to the configured account.
    pub fn expecting(self, configured: Option<Address>) -> Result<Self, WalletError> {
        match configured {
            Some(configured) if configured != self.address => Err(WalletError::AddressMismatch {
                derived: self.address,
                configured,
            }),
            _ => Ok(self),
        }
    }
}

impl fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TransactionSigner for LocalKeySigner {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn sign(
        &self,
        body: &TransactionBody,
        comment: &TransactionComment,
    ) -> Result<SignedTransaction, WalletError> {
        tracing::debug!(signer = %self.name, comment = %comment, "signing transaction");

        let hash = body.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());

        Ok(SignedTransaction {
            body: body.clone(),
            signature: bytes,
            origin: self.address,
        })
    }
}

/// Account address of a secp256k1 key: last 20 bytes of the keccak-256 of the
/// uncompressed public key.
pub fn address_of(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Signers ranked by preference; the first available one is used.
#[derive(Clone, Default)]
pub struct WalletProviders {
    ranked: Vec<Arc<dyn TransactionSigner>>,
}

impl WalletProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, signer: Arc<dyn TransactionSigner>) -> Self {
        self.ranked.push(signer);
        self
    }

    pub fn select(&self) -> Result<Arc<dyn TransactionSigner>, WalletError> {
        self.ranked
            .iter()
            .find(|s| s.is_available())
            .cloned()
            .ok_or(WalletError::NoProvider)
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Address of the preferred available signer, if any.
    pub fn address(&self) -> Option<Address> {
        self.select().ok().map(|s| s.address())
    }
}

impl fmt::Debug for WalletProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.ranked.iter().map(|s| s.name().to_string()))
            .finish()
    }
}
