use super::encoder::NotarizationEncoder;
use super::submitter::{SubmissionError, TransactionSubmitter};
use crate::domain::{NotarizationRequest, SubmissionResult};
use crate::infrastructure::WalletProviders;

/// Prepaid notarization: encode the digest, sign with the first available
/// provider and send.
pub struct NotarizeUseCase {
    encoder: NotarizationEncoder,
    submitter: TransactionSubmitter,
    explorer_url: String,
}

impl NotarizeUseCase {
    pub fn new(
        encoder: NotarizationEncoder,
        submitter: TransactionSubmitter,
        explorer_url: &str,
    ) -> Self {
        Self {
            encoder,
            submitter,
            explorer_url: explorer_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn execute(
        &self,
        request: &NotarizationRequest,
        providers: &WalletProviders,
    ) -> Result<SubmissionResult, SubmissionError> {
        let signer = providers.select()?;
        let encoded = self.encoder.encode(request);

        tracing::info!(
            digest = %request.digest.short(),
            submitter = %request.submitter,
            mode = %encoded.mode,
            signer = signer.name(),
            "notarizing document"
        );

        let sent = self
            .submitter
            .submit(encoded.clauses, &encoded.comment, signer.as_ref())
            .await?;

        Ok(SubmissionResult {
            explorer_url: self.explorer_link(&sent.id),
            transaction_id: sent.id,
            comment: encoded.comment.as_str().to_string(),
            mode: encoded.mode,
        })
    }

    pub fn explorer_link(&self, transaction_id: &str) -> String {
        format!("{}/transactions/{}", self.explorer_url, transaction_id)
    }
}
