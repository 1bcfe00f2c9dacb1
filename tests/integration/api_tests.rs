use super::helpers::*;
use super::mock_node::MockThorNode;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolEvent};
use hyper::{Body, Method, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use trustseal::contracts::{DocumentNotary, DocumentRegistry};
use trustseal::{MockLedger, ThorClient};

async fn start_node() -> (MockThorNode, String) {
    let node = MockThorNode::new();
    let url = node.start().await;
    // Wait for server to be ready
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    (node, url)
}

fn thor_state(url: &str, vars: &[(&str, &str)]) -> Arc<trustseal::AppState> {
    state(config(url, vars), Arc::new(ThorClient::new(url)))
}

fn registry_vars() -> Vec<(&'static str, &'static str)> {
    vec![("CONTRACT_ADDRESS", CONTRACT), ("PRIVATE_KEY", SERVER_KEY)]
}

#[tokio::test]
async fn test_health_reports_configuration() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["node"], url);
    assert_eq!(body["hasWallet"], true);
    assert_eq!(
        body["contract"].as_str().unwrap().to_lowercase(),
        CONTRACT.to_lowercase()
    );
}

#[tokio::test]
async fn test_register_rejects_short_digest() {
    let (node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());
    let short = &DIGEST[..63];

    let (status, body) = call(&state, post("/api/register", registration(short, "deed"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("32 bytes"));
    assert!(node.raw_transactions().is_empty());
}

#[tokio::test]
async fn test_register_submits_one_transaction() {
    let (node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, post("/api/register", registration(DIGEST, "deed"))).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["ok"], true);
    assert!(body["txid"].as_str().unwrap().starts_with("0x"));

    let raws = node.raw_transactions();
    assert_eq!(raws.len(), 1);
    let selector = hex::encode(DocumentRegistry::registerDocumentCall::SELECTOR);
    assert!(raws[0].contains(&selector));
}

#[tokio::test]
async fn test_register_requires_post() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, get("/api/register")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_register_without_contract_is_rejected() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &[("PRIVATE_KEY", SERVER_KEY)]);

    let (status, body) = call(&state, post("/api/register", registration(DIGEST, "deed"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONTRACT_ADDRESS missing");
}

#[tokio::test]
async fn test_batch_register_two_documents() {
    let (node, url) = start_node().await;
    node.set_clause_gas(35_000);
    let state = thor_state(&url, &registry_vars());

    let other = "b".repeat(64);
    let request = json!({
        "documents": [registration(DIGEST, "one"), registration(&other, "two")]
    });
    let (status, body) = call(&state, post("/api/batch-register", request)).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["documentsCount"], 2);
    assert_eq!(body["estimatedGas"], 70_000);
    assert_eq!(body["gasPerDocument"], 35_000);
    assert_eq!(node.raw_transactions().len(), 1);
}

#[tokio::test]
async fn test_batch_register_requires_documents() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, post("/api/batch-register", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "documents array required");

    let (status, body) = call(
        &state,
        post(
            "/api/batch-register",
            json!({ "documents": [registration(DIGEST, "one"), { "hash": DIGEST }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Each document needs hash, reference, metadataURI");
}

#[tokio::test]
async fn test_document_lookup_returns_millis() {
    let (node, url) = start_node().await;
    node.set_call_output(&DocumentRegistry::getDocumentInfoCall::abi_encode_returns(&(
        Address::repeat_byte(0x42),
        U256::from(1_700_000_000u64),
        "ipfs://deed".to_string(),
        U256::from(2u64),
        true,
    )));
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, get(&format!("/api/document/{}", DIGEST))).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["hash"], format!("0x{}", DIGEST));
    assert_eq!(body["owner"], format!("0x{}", "42".repeat(20)));
    assert_eq!(body["timestamp"], 1_700_000_000_000u64);
    assert_eq!(body["metadataURI"], "ipfs://deed");
    assert_eq!(body["voteCount"], 2);
    assert_eq!(body["exists"], true);
}

#[tokio::test]
async fn test_document_lookup_bad_hash() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, get("/api/document/0x1234")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_cost_monitor_report() {
    let (node, url) = start_node().await;
    // 0.5 VET
    node.set_balance(500_000_000_000_000_000);
    let state = thor_state(&url, &registry_vars());

    let (status, body) = call(&state, get("/api/cost-monitor?documents=4")).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["wallet"]["address"], SERVER_ADDRESS);
    assert_eq!(body["wallet"]["balanceVET"], "0.5000");
    assert_eq!(body["network"], "mainnet");
    assert_eq!(body["costs"]["singleDocument"]["gasEstimate"], 50_000);
    assert_eq!(body["costs"]["batchDocument"]["gasEstimate"], 35_000);
    assert_eq!(body["costs"]["batchDocument"]["savings"], "30%");
    assert_eq!(body["batch"]["totalGas"], 140_000);

    let advice = body["recommendations"].as_array().unwrap();
    assert_eq!(advice.len(), 3);
    assert!(advice[0].as_str().unwrap().contains("Low wallet balance"));
}

#[tokio::test]
async fn test_prepaid_data_embed() {
    let (node, url) = start_node().await;
    let state = thor_state(&url, &[("PREPAID_PK", SERVER_KEY), ("PREPAID_ADDRESS", SERVER_ADDRESS)]);

    let request = json!({ "hash": DIGEST, "userAddress": "0xuser", "userComment": "Lease" });
    let (status, body) = call(&state, post("/api/prepaid-tx", request)).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["method"], "data-embed");
    assert_eq!(body["comment"], "Lease");
    let txid = body["txid"].as_str().unwrap();
    assert_eq!(
        body["explorerUrl"],
        format!("https://explore-testnet.vechain.org/transactions/{}", txid)
    );

    // The JSON payload travels verbatim in the clause data.
    let raws = node.raw_transactions();
    assert_eq!(raws.len(), 1);
    assert!(raws[0].contains(&hex::encode(format!("\"h\":\"0x{}\"", DIGEST))));
}

#[tokio::test]
async fn test_prepaid_missing_fields() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &[("PREPAID_PK", SERVER_KEY)]);

    let (status, body) = call(&state, post("/api/prepaid-tx", json!({ "hash": DIGEST }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing hash or userAddress");
}

#[tokio::test]
async fn test_prepaid_node_rejection_is_500() {
    let (node, url) = start_node().await;
    node.reject_transactions("insufficient energy");
    let state = thor_state(&url, &[("PREPAID_PK", SERVER_KEY)]);

    let request = json!({ "hash": DIGEST, "userAddress": "0xuser" });
    let (status, body) = call(&state, post("/api/prepaid-tx", request)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["details"], "insufficient energy");
}

#[tokio::test]
async fn test_verify_seeded_contract_event() {
    let (node, url) = start_node().await;
    let id = format!("0x{}", "c1".repeat(32));
    let event = DocumentNotary::DocumentNotarized {
        sender: Address::repeat_byte(0x33),
        documentHash: format!("0x{}", DIGEST),
        comment: "memo".to_string(),
    };
    node.insert_transaction(
        &id,
        json!({
            "id": id,
            "origin": format!("0x{}", "33".repeat(20)),
            "clauses": [{ "to": CONTRACT, "value": "0x0", "data": "0x" }],
            "gas": 80_000
        }),
        json!({
            "gasUsed": 60_000,
            "reverted": false,
            "outputs": [{
                "contractAddress": null,
                "events": [{
                    "address": CONTRACT,
                    "topics": [format!("0x{}", hex::encode(DocumentNotary::DocumentNotarized::SIGNATURE_HASH))],
                    "data": format!("0x{}", hex::encode(event.encode_data()))
                }],
                "transfers": []
            }]
        }),
    );
    let state = thor_state(&url, &[]);

    let (status, body) = call(&state, get(&format!("/api/verify/{}", id))).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["mode"], "contract-event");
    assert_eq!(body["documentHash"], format!("0x{}", DIGEST));
    assert_eq!(body["comment"], "memo");
    assert_eq!(body["sender"], format!("0x{}", "33".repeat(20)));
}

#[tokio::test]
async fn test_verify_raw_payload_fallback() {
    let (node, url) = start_node().await;
    let id = format!("0x{}", "d2".repeat(32));
    node.insert_transaction(
        &id,
        json!({
            "id": id,
            "origin": "0x",
            "clauses": [{ "to": null, "value": "0x0", "data": "0x0102ff" }],
            "gas": 60_000
        }),
        json!({ "gasUsed": 53_000, "reverted": false, "outputs": [] }),
    );
    let state = thor_state(&url, &[]);

    let (status, body) = call(&state, get(&format!("/api/verify/{}?mode=data-embed", id))).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["mode"], "raw");
    assert_eq!(body["data"], "0x0102ff");
    assert!(body["decode-warning"].is_string());
}

#[tokio::test]
async fn test_verify_unknown_transaction() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &[]);

    let (status, _) = call(&state, get(&format!("/api/verify/0x{}", "ee".repeat(32)))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&state, get(&format!("/api/verify/0x{}?mode=bogus", "ee".repeat(32)))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prepaid_then_verify_round_trip() {
    let ledger = MockLedger::new();
    let state = state(
        config("https://testnet.vechain.org", &[("PRIVATE_KEY", SERVER_KEY)]),
        Arc::new(ledger),
    );

    let request = json!({ "hash": format!("0x{}", DIGEST), "userAddress": "0xuser" });
    let (status, body) = call(&state, post("/api/prepaid-tx", request)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["comment"], "Notarized: a1b2a1b2...");

    let txid = body["txid"].as_str().unwrap().to_string();
    let method = body["method"].as_str().unwrap().to_string();
    let (status, decoded) =
        call(&state, get(&format!("/api/verify/{}?mode={}", txid, method))).await;

    assert_eq!(status, StatusCode::OK, "{}", decoded);
    assert_eq!(decoded["mode"], "data-embed");
    assert_eq!(decoded["hash"], format!("0x{}", DIGEST));
    assert_eq!(decoded["comment"], "");
}

#[tokio::test]
async fn test_options_and_unknown_routes_carry_cors() {
    let (_node, url) = start_node().await;
    let state = thor_state(&url, &[("CORS_ORIGIN", "https://app.example")]);

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/prepaid-tx")
        .body(Body::empty())
        .unwrap();
    let response = trustseal::handlers::route(state.clone(), preflight)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example"
    );

    let response = trustseal::handlers::route(state.clone(), get("/api/nothing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example"
    );
}
