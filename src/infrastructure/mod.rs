pub mod ledger;
pub mod mock;
pub mod thor;
pub mod transaction;
pub mod wallet;

pub use ledger::{Ledger, LedgerError};
pub use mock::MockLedger;
pub use thor::ThorClient;
pub use transaction::{SignedTransaction, TransactionBody};
pub use wallet::{LocalKeySigner, TransactionSigner, WalletError, WalletProviders};
