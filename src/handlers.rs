//! HTTP endpoints.
//!
//! `route` is the whole service: the binary wraps it in a hyper server and
//! the integration tests call it directly.

use crate::application::cost;
use crate::domain::{DocumentRegistration, EncodingMode, NotarizationRequest};
use crate::error::ApiError;
use crate::state::AppState;
use hyper::header::{self, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;

/// Error bodies differ between the prepaid endpoint and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    /// `{ok: false, error}`
    Api,
    /// `{success: false, error, details}`
    Prepaid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrepaidRequest {
    hash: Option<String>,
    user_address: Option<String>,
    user_comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchRequest {
    documents: Option<Vec<DocumentRegistration>>,
}

pub async fn route(state: Arc<AppState>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_string();
    let query = req.uri().query().unwrap_or_default().to_string();

    tracing::debug!(%method, %path, "request");

    if method == Method::OPTIONS {
        return Ok(with_cors(&state, empty(StatusCode::NO_CONTENT)));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (surface, result) = match segments.as_slice() {
        ["api", "health"] => (Surface::Api, Ok(health(&state))),
        ["api", "document", hash] => (
            Surface::Api,
            only(&method, Method::GET, document(&state, hash)).await,
        ),
        ["api", "register"] => (
            Surface::Api,
            only(&method, Method::POST, register(&state, req)).await,
        ),
        ["api", "batch-register"] => (
            Surface::Api,
            only(&method, Method::POST, batch_register(&state, req)).await,
        ),
        ["api", "cost-monitor"] => (
            Surface::Api,
            only(&method, Method::GET, cost_monitor(&state, &query)).await,
        ),
        ["api", "prepaid-tx"] => (
            Surface::Prepaid,
            only(&method, Method::POST, prepaid_tx(&state, req)).await,
        ),
        ["api", "verify", txid] => (
            Surface::Api,
            only(&method, Method::GET, verify(&state, txid, &query)).await,
        ),
        _ => (
            Surface::Api,
            Err(ApiError::NotFound(format!("No route for {}", path))),
        ),
    };

    let response = match result {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(e) => error_response(surface, &e),
    };
    Ok(with_cors(&state, response))
}

async fn only<F>(method: &Method, allowed: Method, handler: F) -> Result<Value, ApiError>
where
    F: std::future::Future<Output = Result<Value, ApiError>>,
{
    if *method != allowed {
        return Err(ApiError::MethodNotAllowed);
    }
    handler.await
}

fn health(state: &AppState) -> Value {
    json!({
        "ok": true,
        "node": state.config.node_url,
        "hasWallet": !state.server_wallet.is_empty(),
        "contract": state.config.contract_address.map(|a| a.to_checksum(None)),
    })
}

async fn document(state: &AppState, hash: &str) -> Result<Value, ApiError> {
    let info = state.registry().lookup(hash).await?;
    Ok(serde_json::to_value(info)?)
}

async fn register(state: &AppState, req: Request<Body>) -> Result<Value, ApiError> {
    let registration: DocumentRegistration = read_json(req).await?;
    let txid = state
        .registry()
        .register(&registration, &state.server_wallet)
        .await?;
    Ok(json!({ "ok": true, "txid": txid }))
}

async fn batch_register(state: &AppState, req: Request<Body>) -> Result<Value, ApiError> {
    let batch: BatchRequest = read_json(req).await?;
    let documents = batch.documents.unwrap_or_default();
    tracing::info!(documents = documents.len(), "batch registration requested");

    let registered = state
        .registry()
        .batch_register(&documents, &state.server_wallet)
        .await?;

    let mut body = serde_json::to_value(registered)?;
    body["ok"] = json!(true);
    Ok(body)
}

async fn cost_monitor(state: &AppState, query: &str) -> Result<Value, ApiError> {
    if state.config.contract_address.is_none() {
        return Err(ApiError::Configuration("CONTRACT_ADDRESS missing".to_string()));
    }

    let documents = match query_param(query, "documents") {
        Some(n) => Some(n.parse::<u64>().map_err(|_| {
            ApiError::Validation(format!("documents must be a positive number, got {}", n))
        })?),
        None => None,
    };

    let report = state
        .cost_monitor()
        .report(state.server_wallet.address(), documents)
        .await?;

    tracing::debug!(
        network = report.network,
        savings = cost::savings_percent(),
        "cost report built"
    );
    Ok(serde_json::to_value(report)?)
}

async fn prepaid_tx(state: &AppState, req: Request<Body>) -> Result<Value, ApiError> {
    let body: PrepaidRequest = read_json(req).await?;
    let (hash, user) = match (body.hash.as_deref(), body.user_address.as_deref()) {
        (Some(h), Some(u)) if !h.is_empty() && !u.is_empty() => (h, u),
        _ => {
            return Err(ApiError::Validation(
                "Missing hash or userAddress".to_string(),
            ))
        }
    };

    let request = NotarizationRequest::new(hash, user, body.user_comment.as_deref())?;
    let result = state
        .notarize()
        .execute(&request, &state.prepaid_wallet)
        .await?;

    let mut body = serde_json::to_value(result)?;
    body["success"] = json!(true);
    Ok(body)
}

async fn verify(state: &AppState, txid: &str, query: &str) -> Result<Value, ApiError> {
    let hint = query_param(query, "mode")
        .map(|m| m.parse::<EncodingMode>().map_err(ApiError::Validation))
        .transpose()?;

    let decoded = state
        .verify()
        .execute(txid, hint)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {} not found", txid)))?;

    let mut body = serde_json::to_value(decoded)?;
    body["ok"] = json!(true);
    body["txid"] = json!(txid);
    Ok(body)
}

async fn read_json<T: DeserializeOwned + Default>(req: Request<Body>) -> Result<T, ApiError> {
    let bytes = hyper::body::to_bytes(req.into_body())
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read body: {}", e)))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn error_response(surface: Surface, error: &ApiError) -> Response<Body> {
    let (status, body) = match surface {
        Surface::Api => {
            let mut body = json!({ "ok": false, "error": error.to_string() });
            if let Some(details) = error.details() {
                body["details"] = json!(details);
            }
            (error.status_code(), body)
        }
        Surface::Prepaid => {
            let status = match error {
                ApiError::Validation(_) | ApiError::MethodNotAllowed => error.status_code(),
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = json!({
                "success": false,
                "error": error.to_string(),
                "details": error.details(),
            });
            (status, body)
        }
    };

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %error, "request failed");
    } else {
        tracing::warn!(status = status.as_u16(), error = %error, "request rejected");
    }
    json_response(status, &body)
}

fn json_response(status: StatusCode, body: &Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn empty(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

fn with_cors(state: &AppState, mut response: Response<Body>) -> Response<Body> {
    let headers = response.headers_mut();
    let origin = HeaderValue::from_str(&state.config.cors_origin)
        .unwrap_or_else(|_| HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
