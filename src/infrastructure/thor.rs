use super::ledger::{
    AccountState, BlockSummary, ClauseOutcome, ClauseRecord, Ledger, LedgerError,
    TransactionReceipt, TransactionRecord,
};
use super::transaction::SignedTransaction;
use crate::domain::Clause;
use alloy_primitives::Address;
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use hyper_rustls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

/// HTTP client for a VeChainThor node's REST API.
#[derive(Clone)]
pub struct ThorClient {
    client: Client<HttpsConnector<HttpConnector>>,
    base_url: String,
}

impl ThorClient {
    /// # Arguments
    /// * `base_url` - Node URL (e.g., "https://testnet.vechain.org"); plain
    ///   http is accepted for local nodes.
    pub fn new(base_url: &str) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        Self {
            client: Client::builder().build(connector),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("{}{}", self.base_url, path))
            .header("accept", "application/json")
            .body(Body::empty())?;
        self.execute(request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LedgerError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}{}", self.base_url, path))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?;
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> Result<T, LedgerError> {
        let path = request.uri().path().to_string();
        let response = self.client.request(request).await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).trim().to_string();
            tracing::warn!(%path, status = status.as_u16(), %body, "node rejected request");
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Ledger for ThorClient {
    async fn best_block(&self) -> Result<BlockSummary, LedgerError> {
        self.get("/blocks/best").await
    }

    async fn chain_tag(&self) -> Result<u8, LedgerError> {
        let genesis: BlockSummary = self.get("/blocks/0").await?;
        let id = super::ledger::decode_hex(&genesis.id)?;
        id.last()
            .copied()
            .ok_or_else(|| LedgerError::Malformed("empty genesis block id".to_string()))
    }

    async fn account(&self, address: &Address) -> Result<AccountState, LedgerError> {
        self.get(&format!("/accounts/0x{}", hex::encode(address.as_slice())))
            .await
    }

    async fn inspect(
        &self,
        clauses: &[Clause],
        caller: Option<&Address>,
    ) -> Result<Vec<ClauseOutcome>, LedgerError> {
        let clauses: Vec<ClauseRecord> = clauses.iter().map(ClauseRecord::from).collect();
        let mut body = json!({ "clauses": clauses });
        if let Some(caller) = caller {
            body["caller"] = json!(format!("0x{}", hex::encode(caller.as_slice())));
        }
        self.post("/accounts/*", &body).await
    }

    async fn send(&self, tx: &SignedTransaction) -> Result<String, LedgerError> {
        #[derive(serde::Deserialize)]
        struct Sent {
            id: String,
        }

        let sent: Sent = self
            .post("/transactions", &json!({ "raw": tx.raw_hex() }))
            .await?;
        Ok(sent.id)
    }

    async fn transaction(&self, id: &str) -> Result<Option<TransactionRecord>, LedgerError> {
        self.get(&format!("/transactions/{}", id)).await
    }

    async fn receipt(&self, id: &str) -> Result<Option<TransactionReceipt>, LedgerError> {
        self.get(&format!("/transactions/{}/receipt", id)).await
    }
}
