pub mod application;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod logging;
pub mod state;

// Re-export commonly used types
pub use application::{NotarizationEncoder, NotarizeUseCase, TransactionSubmitter, VerifyUseCase};
pub use config::Config;
pub use domain::{DecodedNotarization, DocumentDigest, EncodingMode, SubmissionResult};
pub use error::ApiError;
pub use infrastructure::{Ledger, MockLedger, ThorClient};
pub use state::AppState;
