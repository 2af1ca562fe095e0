//! Integration tests for the gateway client, driven against a local mock
//! MCP server.

use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use sei_mcp_client::{ClientConfig, ConnectionState, Error, GatewayClient};

fn test_config(server: &ServerGuard) -> ClientConfig {
    ClientConfig {
        base_url: url::Url::parse(&server.url()).unwrap(),
        connect_retry_attempts: 1,
        connect_retry_delay: Duration::from_millis(10),
        ..ClientConfig::default()
    }
}

fn rpc_result(result: serde_json::Value) -> String {
    json!({ "jsonrpc": "2.0", "id": "req-0", "result": result }).to_string()
}

async fn mock_health(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn concurrent_calls_share_one_connect() {
    let mut server = Server::new_async().await;
    let health = mock_health(&mut server, 1).await;
    let rpc = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(json!({ "method": "get_balance" })))
        .with_status(200)
        .with_body(rpc_result(json!({ "amount": "42", "denom": "usei" })))
        .expect(8)
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));

    // Distinct addresses so no call is served from cache
    let addresses: Vec<String> = (0..8).map(|i| format!("0x{:040x}", i)).collect();
    let calls = addresses
        .iter()
        .map(|address| client.get_balance(address, None));

    for outcome in futures::future::join_all(calls).await {
        assert_eq!(outcome.unwrap().amount, "42");
    }

    assert_eq!(client.state(), ConnectionState::Connected);
    health.assert_async().await;
    rpc.assert_async().await;
}

#[tokio::test]
async fn concurrent_callers_observe_same_connect_failure() {
    let mut server = Server::new_async().await;
    let health = server
        .mock("GET", "/health")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));

    let attempts = (0..5).map(|_| client.connect());
    for outcome in futures::future::join_all(attempts).await {
        let err = outcome.unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "got {err:?}");
    }

    assert_eq!(client.state(), ConnectionState::Disconnected);
    health.assert_async().await;
}

#[tokio::test]
async fn reconnect_after_failure_retries_handshake() {
    let mut server = Server::new_async().await;
    let broken = server
        .mock("GET", "/health")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    assert!(client.connect().await.is_err());
    assert_eq!(client.state(), ConnectionState::Disconnected);
    broken.assert_async().await;

    // Gateway comes back; the next call performs a fresh handshake
    server.reset_async().await;
    let healthy = mock_health(&mut server, 1).await;
    client.connect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Connected);
    healthy.assert_async().await;
}

#[tokio::test]
async fn reads_are_cached_and_mutations_are_not() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    let read = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(json!({ "method": "get_balance" })))
        .with_status(200)
        .with_body(rpc_result(json!({ "amount": "7", "denom": "usei" })))
        .expect(1)
        .create_async()
        .await;
    let transfer = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(json!({ "method": "transfer_native" })))
        .with_status(200)
        .with_body(rpc_result(json!({ "tx_hash": "0xfeed" })))
        .expect(2)
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    let addr = format!("0x{}", "a".repeat(40));

    // Identical reads inside the TTL reach the wire once
    let first = client.get_balance(&addr, None).await.unwrap();
    let second = client.get_balance(&addr, None).await.unwrap();
    assert_eq!(first, second);

    // Identical mutations always reach the wire
    client.transfer_native(&addr, "100", None).await.unwrap();
    client.transfer_native(&addr, "100", None).await.unwrap();

    read.assert_async().await;
    transfer.assert_async().await;
}

#[tokio::test]
async fn http_500_surfaces_as_request_error_with_status() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    let _rpc = server
        .mock("POST", "/rpc")
        .with_status(500)
        .with_body("internal server error")
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    let err = client
        .get_balance(&format!("0x{}", "a".repeat(40)), None)
        .await
        .unwrap_err();

    match err {
        Error::Request { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn rpc_error_payload_carries_server_message() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    let _rpc = server
        .mock("POST", "/rpc")
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": "req-0",
                "error": { "code": -32602, "message": "invalid address" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    let err = client
        .get_balance(&format!("0x{}", "a".repeat(40)), None)
        .await
        .unwrap_err();

    match err {
        Error::Request { message, status } => {
            assert_eq!(message, "invalid address");
            assert_eq!(status, None);
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_gateway_surfaces_as_connection_error() {
    // Nothing listens here
    let config = ClientConfig {
        base_url: url::Url::parse("http://127.0.0.1:59123").unwrap(),
        connect_retry_attempts: 1,
        connect_retry_delay: Duration::from_millis(10),
        ..ClientConfig::default()
    };
    let client = GatewayClient::new(config);

    let err = client
        .get_balance(&format!("0x{}", "a".repeat(40)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_gateway_surfaces_as_timeout() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    let _rpc = server
        .mock("POST", "/rpc")
        .with_status(200)
        .with_chunked_body(|writer| {
            use std::io::Write;
            std::thread::sleep(Duration::from_millis(500));
            writer.write_all(rpc_result(json!({ "amount": "1", "denom": "usei" })).as_bytes())
        })
        .create_async()
        .await;

    let config = ClientConfig {
        request_timeout: Duration::from_millis(100),
        ..test_config(&server)
    };
    let client = GatewayClient::new(config);

    let err = client
        .get_balance(&format!("0x{}", "a".repeat(40)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn fresh_client_scenario_quota_two() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    let addr_a = format!("0x{}", "a".repeat(40));
    let addr_b = format!("0x{}", "b".repeat(40));
    let addr_c = format!("0x{}", "c".repeat(40));

    let balance_a = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(
            json!({ "method": "get_balance", "params": { "address": addr_a.clone() } }),
        ))
        .with_status(200)
        .with_body(rpc_result(json!({ "amount": "1", "denom": "usei" })))
        .expect(1)
        .create_async()
        .await;
    let balance_b = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(
            json!({ "method": "get_balance", "params": { "address": addr_b.clone() } }),
        ))
        .with_status(200)
        .with_body(rpc_result(json!({ "amount": "2", "denom": "usei" })))
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig {
        rate_limit_per_minute: 2,
        cache_ttl: Duration::from_secs(30),
        ..test_config(&server)
    };
    let client = GatewayClient::new(config);

    // Miss -> dispatch -> cached (first rate-limit slot)
    client.get_balance(&addr_a, None).await.unwrap();
    // Hit: no dispatch, no rate-limit consumption
    client.get_balance(&addr_a, None).await.unwrap();
    // Miss -> dispatch (second rate-limit slot)
    client.get_balance(&addr_b, None).await.unwrap();
    // Quota exhausted
    let err = client.get_balance(&addr_c, None).await.unwrap_err();
    assert!(err.to_string().contains("rate limit"), "got {err:?}");
    assert!(err.is_recoverable());

    balance_a.assert_async().await;
    balance_b.assert_async().await;
}

#[tokio::test]
async fn close_clears_cache_and_disconnects() {
    let mut server = Server::new_async().await;
    // Two connects and two dispatches across the close boundary
    let health = mock_health(&mut server, 2).await;
    let rpc = server
        .mock("POST", "/rpc")
        .match_body(Matcher::PartialJson(json!({ "method": "get_balance" })))
        .with_status(200)
        .with_body(rpc_result(json!({ "amount": "5", "denom": "usei" })))
        .expect(2)
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    let addr = format!("0x{}", "d".repeat(40));

    client.get_balance(&addr, None).await.unwrap();
    client.close().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);

    // The cached entry is gone, so the same read reconnects and re-dispatches
    client.get_balance(&addr, None).await.unwrap();

    health.assert_async().await;
    rpc.assert_async().await;
}

#[tokio::test]
async fn typed_decoding_rejects_partial_results() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server, 1).await;
    // Receipt missing gas_used must surface as an error, not a default
    let _rpc = server
        .mock("POST", "/rpc")
        .with_status(200)
        .with_body(rpc_result(json!({ "tx_hash": "0xabc", "status": true })))
        .create_async()
        .await;

    let client = GatewayClient::new(test_config(&server));
    let err = client
        .get_transaction_receipt(&format!("0x{}", "e".repeat(64)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Request { .. }), "got {err:?}");
}
