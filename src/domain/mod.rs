mod clause;
mod digest;
mod document;
mod receipt;

pub use clause::{
    Clause, EncodingMode, TransactionComment, CONTRACT_COMMENT_PREVIEW, DATA_EMBED_COMMENT_MAX,
};
pub use digest::{normalize, DigestError, DocumentDigest};
pub use document::{
    DocumentInfo, DocumentRegistration, NotarizationRequest, RegistrationError, ValidRegistration,
};
pub use receipt::{DecodedNotarization, EmbeddedNotarization, SubmissionResult};
