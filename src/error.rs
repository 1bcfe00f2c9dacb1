use crate::application::{RegistryError, SubmissionError, VerifyError};
use crate::domain::{DigestError, RegistrationError};
use crate::infrastructure::{LedgerError, WalletError};
use hyper::StatusCode;
use thiserror::Error;

/// Everything an endpoint can fail with, mapped to an HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Configuration(String),

    #[error("{message}")]
    Submission {
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Configuration(_) | ApiError::Submission { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Submission { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

impl From<DigestError> for ApiError {
    fn from(e: DigestError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Validation(format!("Invalid JSON body: {}", e))
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        ApiError::Submission {
            details: e.details().map(str::to_string),
            message: e.to_string(),
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NoProvider => ApiError::Configuration(e.to_string()),
            other => ApiError::Submission {
                message: other.to_string(),
                details: None,
            },
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::Wallet(w) => w.into(),
            other => ApiError::Submission {
                details: other.details(),
                message: other.to_string(),
            },
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidTransactionId => ApiError::Validation(e.to_string()),
            VerifyError::Ledger(l) => l.into(),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::ContractNotConfigured => ApiError::Configuration(e.to_string()),
            RegistryError::EmptyBatch
            | RegistryError::IncompleteDocument { .. }
            | RegistryError::Registration(_)
            | RegistryError::Digest(_) => ApiError::Validation(e.to_string()),
            RegistryError::LookupReverted(_) | RegistryError::Decode(_) => ApiError::Submission {
                message: e.to_string(),
                details: None,
            },
            RegistryError::Ledger(l) => l.into(),
            RegistryError::Submission(s) => s.into(),
        }
    }
}
