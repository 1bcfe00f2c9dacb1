pub mod cost;
mod encoder;
mod notarize;
mod registry;
mod submitter;
mod verify;

pub use cost::{BatchCostEstimate, CostMonitor, CostReport};
pub use encoder::{EncodedNotarization, NotarizationEncoder, RegistryEncoder};
pub use notarize::NotarizeUseCase;
pub use registry::{validate_batch, BatchRegistration, RegistryError, RegistryUseCase};
pub use submitter::{GasEstimate, SubmissionError, SubmittedTransaction, TransactionSubmitter};
pub use verify::{decode_parts, VerifyError, VerifyUseCase};
