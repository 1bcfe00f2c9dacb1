use super::{DocumentDigest, EncodingMode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// JSON object carried in the payload of a data-embed transaction.
///
/// Field order matters: serialization must start with `{` so decoders can
/// sniff the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedNotarization {
    pub h: String,
    pub c: String,
    pub t: String,
}

impl EmbeddedNotarization {
    pub fn new(digest: &DocumentDigest, comment: Option<&str>, at: DateTime<Utc>) -> Self {
        Self {
            h: digest.to_hex(),
            c: comment.unwrap_or_default().to_string(),
            t: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Three string fields cannot fail to serialize.
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.t)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Returned to the caller after a notarization was sent to the ledger.
///
/// `transaction_id` together with `mode` is everything needed to verify the
/// notarization later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(rename = "txid")]
    pub transaction_id: String,
    pub comment: String,
    #[serde(rename = "explorerUrl")]
    pub explorer_url: String,
    #[serde(rename = "method")]
    pub mode: EncodingMode,
}

/// What a settled transaction says about the notarization it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DecodedNotarization {
    #[serde(rename_all = "camelCase")]
    ContractEvent {
        sender: String,
        document_hash: String,
        comment: String,
    },
    DataEmbed {
        hash: String,
        comment: String,
        timestamp: String,
    },
    /// Neither pattern matched; the payload is handed back untouched.
    #[serde(rename = "raw")]
    Raw {
        data: String,
        #[serde(rename = "decode-warning")]
        warning: String,
    },
}

impl DecodedNotarization {
    pub fn mode(&self) -> Option<EncodingMode> {
        match self {
            DecodedNotarization::ContractEvent { .. } => Some(EncodingMode::ContractEvent),
            DecodedNotarization::DataEmbed { .. } => Some(EncodingMode::DataEmbed),
            DecodedNotarization::Raw { .. } => None,
        }
    }
}
