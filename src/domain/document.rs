use super::{DigestError, DocumentDigest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("hash, reference, metadataURI required")]
    MissingFields,

    #[error(transparent)]
    InvalidDigest(#[from] DigestError),
}

/// A user's request to notarize a digest with an optional free-text comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotarizationRequest {
    pub digest: DocumentDigest,
    pub submitter: String,
    pub comment: Option<String>,
}

impl NotarizationRequest {
    pub fn new(digest: &str, submitter: &str, comment: Option<&str>) -> Result<Self, DigestError> {
        Ok(Self {
            digest: DocumentDigest::parse(digest)?,
            submitter: submitter.to_string(),
            // An empty comment is the same as no comment at all.
            comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
        })
    }
}

/// Registry entry as posted by clients.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocumentRegistration {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, rename = "metadataURI")]
    pub metadata_uri: String,
}

impl DocumentRegistration {
    pub fn validate(&self) -> Result<ValidRegistration, RegistrationError> {
        if self.hash.is_empty() || self.reference.is_empty() || self.metadata_uri.is_empty() {
            return Err(RegistrationError::MissingFields);
        }

        Ok(ValidRegistration {
            digest: DocumentDigest::parse(&self.hash)?,
            reference: self.reference.clone(),
            metadata_uri: self.metadata_uri.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub digest: DocumentDigest,
    pub reference: String,
    pub metadata_uri: String,
}

/// Registry state for one digest as returned by `getDocumentInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub hash: String,
    pub owner: String,
    /// Milliseconds since epoch.
    pub timestamp: u64,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub vote_count: u64,
    pub exists: bool,
}
