use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("hash must be 32 bytes (64 hex)")]
    InvalidHashFormat,
}

/// SHA-256 digest of a document, the fact being notarized.
///
/// Accepts 64 hex characters with or without a `0x` prefix and always
/// renders in the canonical `0x`-prefixed lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentDigest([u8; 32]);

impl DocumentDigest {
    pub fn parse(input: &str) -> Result<Self, DigestError> {
        let clean = input.strip_prefix("0x").unwrap_or(input);
        if clean.len() != 64 {
            return Err(DigestError::InvalidHashFormat);
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(clean, &mut bytes).map_err(|_| DigestError::InvalidHashFormat)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a document held in memory.
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    /// Hash a document streamed from any reader.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    pub fn of_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::of_reader(File::open(path)?)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_b256(&self) -> B256 {
        B256::from(self.0)
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Lowercase hex without prefix.
    pub fn hex_body(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, used for display defaults.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

/// Normalize user input into the canonical digest string.
pub fn normalize(input: &str) -> Result<String, DigestError> {
    DocumentDigest::parse(input).map(|d| d.to_hex())
}

impl fmt::Display for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for DocumentDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentDigest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentDigest> for String {
    fn from(value: DocumentDigest) -> Self {
        value.to_hex()
    }
}
