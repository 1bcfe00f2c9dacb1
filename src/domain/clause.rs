use super::DocumentDigest;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a data-embed transaction comment.
pub const DATA_EMBED_COMMENT_MAX: usize = 50;

/// Characters of the comment (or digest) previewed in contract mode.
pub const CONTRACT_COMMENT_PREVIEW: usize = 30;

/// One unit of a ledger transaction. Several clauses submitted together
/// succeed or revert as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// `None` means a data-only clause with no contract involved.
    pub to: Option<Address>,
    pub value: u128,
    pub data: Vec<u8>,
}

impl Clause {
    pub fn call(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: Some(to),
            value: 0,
            data,
        }
    }

    pub fn data_only(data: Vec<u8>) -> Self {
        Self {
            to: None,
            value: 0,
            data,
        }
    }

    pub fn is_contract_call(&self) -> bool {
        self.to.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingMode {
    ContractEvent,
    DataEmbed,
}

impl EncodingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingMode::ContractEvent => "contract-event",
            EncodingMode::DataEmbed => "data-embed",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            EncodingMode::ContractEvent => EncodingMode::DataEmbed,
            EncodingMode::DataEmbed => EncodingMode::ContractEvent,
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contract-event" => Ok(EncodingMode::ContractEvent),
            "data-embed" => Ok(EncodingMode::DataEmbed),
            other => Err(format!("unknown encoding mode: {}", other)),
        }
    }
}

/// Human-readable text shown by wallets next to a transaction.
///
/// Purely cosmetic: it is not part of the signed body and must never be used
/// to verify a notarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionComment(String);

impl TransactionComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn for_contract(comment: Option<&str>, digest: &DocumentDigest) -> Self {
        let source = match comment {
            Some(c) => c.to_string(),
            None => digest.hex_body(),
        };
        Self(format!(
            "Contract notarize: {}...",
            take_chars(&source, CONTRACT_COMMENT_PREVIEW)
        ))
    }

    pub fn for_data_embed(comment: Option<&str>, digest: &DocumentDigest) -> Self {
        match comment {
            Some(c) if c.chars().count() > DATA_EMBED_COMMENT_MAX => Self(format!(
                "{}...",
                take_chars(c, DATA_EMBED_COMMENT_MAX - 3)
            )),
            Some(c) => Self(c.to_string()),
            None => Self(format!("Notarized: {}...", digest.short())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
