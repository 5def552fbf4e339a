use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;
use validator_monitor::{
    Alert, AlertError, AlertSink, BlockHeightSource, CheckpointSnapshot, CheckpointSource,
    FetchError, HeightSnapshot, Monitor, MonitorSettings, RpcClient, TelegramSink,
};

const VALIDATOR: &str = "0xabc0000000000000000000000000000000000def";

const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

fn client(url: &str) -> RpcClient {
    RpcClient::new(url, Duration::from_secs(5)).unwrap()
}

/// Accepts connections and holds them open without ever answering
async fn unresponsive_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_checkpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/checkpoints")
        .match_query(Matcher::UrlEncoded("validator".into(), VALIDATOR.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "lastCheckpointTime": "2024-05-01T10:00:00Z", "count": 12 }).to_string())
        .create_async()
        .await;

    // Trailing slash on the endpoint must not produce a double slash
    let rpc = client(&format!("{}/", server.url()));
    let snapshot = rpc.latest_checkpoint(VALIDATOR).await.unwrap();

    assert_eq!(snapshot, CheckpointSnapshot::new("2024-05-01T10:00:00Z"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_numeric_checkpoint_time() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/checkpoints")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "lastCheckpointTime": 1714557600 }).to_string())
        .create_async()
        .await;

    let snapshot = client(&server.url()).latest_checkpoint(VALIDATOR).await.unwrap();
    assert_eq!(snapshot, CheckpointSnapshot::new(json!(1714557600)));
}

#[tokio::test]
async fn test_missing_checkpoint_field() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/checkpoints")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "lastCheckpointTime": null }).to_string())
        .create_async()
        .await;

    let err = client(&server.url()).latest_checkpoint(VALIDATOR).await.unwrap_err();
    assert_eq!(err, FetchError::MissingField("lastCheckpointTime"));
}

#[tokio::test]
async fn test_checkpoint_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/checkpoints")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("node syncing")
        .create_async()
        .await;

    let err = client(&server.url()).latest_checkpoint(VALIDATOR).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 503,
            body: "node syncing".to_string(),
        }
    );
}

#[tokio::test]
async fn test_checkpoint_invalid_json() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/checkpoints")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let err = client(&server.url()).latest_checkpoint(VALIDATOR).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_fetch_block_heights() {
    let mut server = Server::new_async().await;
    let bor = server
        .mock("GET", "/bor_block_height")
        .with_status(200)
        .with_body("51234567")
        .create_async()
        .await;
    let heimdall = server
        .mock("GET", "/heimdall_block_height")
        .with_status(200)
        .with_body("\"51234566\"")
        .create_async()
        .await;

    let heights = client(&server.url()).block_heights().await.unwrap();

    assert_eq!(heights, HeightSnapshot::new(51234567, 51234566));
    bor.assert_async().await;
    heimdall.assert_async().await;
}

#[tokio::test]
async fn test_heimdall_failure_fails_heights() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bor_block_height")
        .with_status(200)
        .with_body("100")
        .create_async()
        .await;
    server
        .mock("GET", "/heimdall_block_height")
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server.url()).block_heights().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_bor_failure_skips_heimdall_request() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bor_block_height")
        .with_status(404)
        .create_async()
        .await;
    let heimdall = server
        .mock("GET", "/heimdall_block_height")
        .with_status(200)
        .with_body("100")
        .expect(0)
        .create_async()
        .await;

    assert!(client(&server.url()).block_heights().await.is_err());
    heimdall.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // Nothing listens on port 1
    let err = client("http://127.0.0.1:1").block_heights().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_telegram_send() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bot123:secret/sendMessage")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("chat_id".into(), "-100200".into()),
            Matcher::UrlEncoded("text".into(), "Failed to fetch block heights.".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "ok": true }).to_string())
        .create_async()
        .await;

    let sink = TelegramSink::new("123:secret", "-100200", Duration::from_secs(5))
        .unwrap()
        .with_api_url(&format!("{}/", server.url()));
    sink.send("Failed to fetch block heights.").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_telegram_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/bot123:secret/sendMessage")
        .with_status(401)
        .with_body(json!({ "ok": false, "description": "Unauthorized" }).to_string())
        .create_async()
        .await;

    let sink = TelegramSink::new("123:secret", "-100200", Duration::from_secs(5))
        .unwrap()
        .with_api_url(&server.url());
    let err = sink.send("hello").await.unwrap_err();

    assert!(matches!(err, AlertError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_telegram_error_hides_token() {
    let sink = TelegramSink::new("123:secret", "-100200", Duration::from_secs(5))
        .unwrap()
        .with_api_url("http://127.0.0.1:1");
    let err = sink.send("hello").await.unwrap_err();

    assert!(matches!(err, AlertError::Transport(_)));
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn test_rpc_request_timeout() {
    let url = unresponsive_server().await;
    let rpc = RpcClient::new(&url, SHORT_TIMEOUT).unwrap();

    let err = rpc.latest_checkpoint(VALIDATOR).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)), "unexpected error: {:?}", err);

    let err = rpc.block_heights().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_telegram_request_timeout() {
    let url = unresponsive_server().await;
    let sink = TelegramSink::new("123:secret", "42", SHORT_TIMEOUT)
        .unwrap()
        .with_api_url(&url);

    let err = sink.send("Bor block height is not increasing.").await.unwrap_err();
    assert!(matches!(err, AlertError::Timeout(_)), "unexpected error: {:?}", err);
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn test_timeouts_are_cycle_failures() {
    let url = unresponsive_server().await;
    let rpc = Arc::new(RpcClient::new(&url, SHORT_TIMEOUT).unwrap());
    let sink = Arc::new(
        TelegramSink::new("123:secret", "42", SHORT_TIMEOUT)
            .unwrap()
            .with_api_url(&url),
    );
    let mut monitor = Monitor::new(MonitorSettings::new(VALIDATOR), rpc.clone(), rpc, sink);

    let report = monitor.run_cycle().await;

    let expected = vec![Alert::CheckpointFetchFailed, Alert::HeightFetchFailed];
    assert_eq!(report.alerts, expected);
    assert_eq!(report.undelivered, expected);
    assert_eq!(monitor.state().last_checkpoint_time(), None);
    assert_eq!(monitor.state().last_primary_height(), None);
}
