/// Integration tests for the withdrawal API
mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use common::{parse_error, test_state, MockChainClient, TREASURY_ADDRESS};

fn server(chain: std::sync::Arc<MockChainClient>) -> TestServer {
    TestServer::new(backend::build_router(test_state(chain))).expect("Failed to start test server")
}

#[tokio::test]
async fn test_withdraw_success() {
    let chain = MockChainClient::with_treasury_balance(1_000_000_000_000);
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "0xABCDEF",
            "amount_subunits": 100_000_000_u64
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["amount_subunits"], 100_000_000);
    assert_eq!(body["treasury_address"], TREASURY_ADDRESS);
    // Addresses are normalized to the 0x-prefixed lowercase form
    assert_eq!(body["user_address"], "0xabcdef");
    assert!(body["transaction_hash"].as_str().unwrap().starts_with("0xmock"));

    assert_eq!(
        chain.transfers.lock().unwrap().as_slice(),
        &[("0xabcdef".to_string(), 100_000_000)]
    );
}

#[tokio::test]
async fn test_withdraw_rejects_zero_amount() {
    let chain = MockChainClient::with_treasury_balance(1_000_000_000_000);
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "0xabcdef",
            "amount_subunits": 0
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let (code, _, category) = parse_error(&response.text()).expect("Failed to parse error");
    assert_eq!(code, "VALIDATION_INVALID_AMOUNT");
    assert_eq!(category, "VALIDATION");

    // Nothing was transferred
    assert!(chain.transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_withdraw_rejects_malformed_address() {
    let chain = MockChainClient::with_treasury_balance(1_000_000_000_000);
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "not-a-hex-address",
            "amount_subunits": 100_000_000_u64
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let (code, message, _) = parse_error(&response.text()).expect("Failed to parse error");
    assert_eq!(code, "VALIDATION_INVALID_ADDRESS");
    assert!(message.contains("not-a-hex-address"));
}

#[tokio::test]
async fn test_withdraw_rejects_when_treasury_underfunded() {
    let chain = MockChainClient::with_treasury_balance(50_000_000);
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "0xabcdef",
            "amount_subunits": 100_000_000_u64
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let (code, _, category) = parse_error(&response.text()).expect("Failed to parse error");
    assert_eq!(code, "CHAIN_TREASURY_UNFUNDED");
    assert_eq!(category, "CHAIN");
    assert!(chain.transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_withdraw_proceeds_when_treasury_unreadable() {
    // An unreadable treasury balance is tolerated; the node decides.
    let chain = MockChainClient::with_unreadable_treasury();
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "0xabcdef",
            "amount_subunits": 100_000_000_u64
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(chain.transfers.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_withdraw_surfaces_transfer_failure() {
    let chain = MockChainClient::with_treasury_balance(1_000_000_000_000);
    *chain.fail_transfers.lock().unwrap() = true;
    let server = server(chain.clone());

    let response = server
        .post("/api/withdraw")
        .json(&json!({
            "user_address": "0xabcdef",
            "amount_subunits": 100_000_000_u64
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let (code, _, category) = parse_error(&response.text()).expect("Failed to parse error");
    assert_eq!(code, "CHAIN_TRANSFER_FAILED");
    assert_eq!(category, "CHAIN");
}

#[tokio::test]
async fn test_treasury_status_active() {
    let chain = MockChainClient::with_treasury_balance(750_000_000);
    let server = server(chain);

    let response = server.get("/api/treasury").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["treasury_address"], TREASURY_ADDRESS);
    assert_eq!(body["balance_subunits"], "750000000");
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_treasury_status_initializing() {
    let chain = MockChainClient::with_unreadable_treasury();
    let server = server(chain);

    let response = server.get("/api/treasury").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["balance_subunits"], "0");
    assert_eq!(body["status"], "initializing");
}

#[tokio::test]
async fn test_health_endpoints() {
    let chain = MockChainClient::with_treasury_balance(1);
    let server = server(chain);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/detailed").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["components"]["chain"], "healthy");
}
