use crate::application::{
    CostMonitor, NotarizationEncoder, NotarizeUseCase, RegistryUseCase, TransactionSubmitter,
    VerifyUseCase,
};
use crate::config::Config;
use crate::infrastructure::{Ledger, LocalKeySigner, TransactionSigner, WalletError, WalletProviders};
use std::sync::Arc;

/// Shared by every request. Holds no mutable state.
pub struct AppState {
    pub config: Config,
    pub ledger: Arc<dyn Ledger>,
    /// Signs registry transactions.
    pub server_wallet: WalletProviders,
    /// Signs prepaid notarizations: prepaid key first, server key second.
    pub prepaid_wallet: WalletProviders,
}

impl AppState {
    /// Fails when a configured key is unusable or does not match its
    /// configured address.
    pub fn new(config: Config, ledger: Arc<dyn Ledger>) -> Result<Self, WalletError> {
        let server: Option<Arc<dyn TransactionSigner>> = match &config.private_key {
            Some(key) => Some(Arc::new(LocalKeySigner::from_hex("server", key)?)),
            None => None,
        };

        let prepaid: Option<Arc<dyn TransactionSigner>> = match &config.prepaid_private_key {
            Some(key) => Some(Arc::new(
                LocalKeySigner::from_hex("prepaid", key)?.expecting(config.prepaid_address)?,
            )),
            None => None,
        };

        let server_wallet = server.iter().cloned().fold(WalletProviders::new(), WalletProviders::with);
        let prepaid_wallet = prepaid
            .into_iter()
            .chain(server)
            .fold(WalletProviders::new(), WalletProviders::with);

        tracing::debug!(?server_wallet, ?prepaid_wallet, "wallet providers ready");

        Ok(Self {
            config,
            ledger,
            server_wallet,
            prepaid_wallet,
        })
    }

    pub fn submitter(&self) -> TransactionSubmitter {
        TransactionSubmitter::new(self.ledger.clone())
            .with_expiration(self.config.tx_expiration)
            .with_gas_price_coef(self.config.gas_price_coef)
    }

    pub fn notarize(&self) -> NotarizeUseCase {
        NotarizeUseCase::new(
            NotarizationEncoder::new(self.config.contract_address),
            self.submitter(),
            &self.config.explorer_url,
        )
    }

    pub fn verify(&self) -> VerifyUseCase {
        VerifyUseCase::new(self.ledger.clone())
    }

    pub fn registry(&self) -> RegistryUseCase {
        RegistryUseCase::new(
            self.ledger.clone(),
            self.submitter(),
            self.config.contract_address,
        )
    }

    pub fn cost_monitor(&self) -> CostMonitor {
        CostMonitor::new(self.ledger.clone(), &self.config.node_url)
    }
}
