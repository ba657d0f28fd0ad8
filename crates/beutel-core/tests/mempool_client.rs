use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use beutel_core::types::{BlockHeight, Direction};
use beutel_core::{
    ChainProvider, CoreError, LogContext, MempoolClient, MempoolOptions, Network, UpstreamError,
};
use serde_json::json;

const SUBJECT: &str = "tb1qsubject";
const TXID_A: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
const TXID_B: &str = "e3bf3d07d4b0375638d5f1db5255fe07ba2c4cb067cd81b84ee974b6585fb468";

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("beutel_core=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

// ==============================================================================
// Fake Upstream
// ==============================================================================

#[derive(Clone, Default)]
struct FakeUpstream {
    hits: Arc<AtomicUsize>,
    fail_with: Option<u16>,
    broadcast: Arc<Mutex<Option<(String, String)>>>,
}

impl FakeUpstream {
    fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    /// Count the hit and return the canned failure, if configured.
    fn enter(&self) -> Option<Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.fail_with.map(|status| {
            let status = StatusCode::from_u16(status).expect("fixture status must be valid");
            (status, "upstream says no").into_response()
        })
    }
}

async fn address_info(State(up): State<FakeUpstream>, Path(address): Path<String>) -> Response {
    if let Some(failure) = up.enter() {
        return failure;
    }
    Json(json!({
        "address": address,
        "chain_stats": { "funded_txo_count": 2, "funded_txo_sum": 150000, "spent_txo_count": 1, "spent_txo_sum": 50000, "tx_count": 3 },
        "mempool_stats": { "funded_txo_count": 1, "funded_txo_sum": 20000, "spent_txo_count": 0, "spent_txo_sum": 0, "tx_count": 1 }
    }))
    .into_response()
}

async fn address_utxos(State(up): State<FakeUpstream>, Path(_address): Path<String>) -> Response {
    if let Some(failure) = up.enter() {
        return failure;
    }
    Json(json!([
        { "txid": TXID_A, "vout": 1, "value": 39000,
          "status": { "confirmed": true, "block_height": 60000, "block_hash": "00", "block_time": 1714000000 } },
        { "txid": TXID_B, "vout": 0, "value": 20000, "status": { "confirmed": false } }
    ]))
    .into_response()
}

async fn address_txs(State(up): State<FakeUpstream>, Path(address): Path<String>) -> Response {
    if let Some(failure) = up.enter() {
        return failure;
    }
    Json(json!([
        {
            "txid": TXID_B,
            "vin": [ { "prevout": { "scriptpubkey_address": "tb1qsender", "value": 25000 } } ],
            "vout": [ { "scriptpubkey_address": address, "value": 20000 },
                      { "scriptpubkey_address": "tb1qsender", "value": 4800 } ],
            "fee": 200,
            "status": { "confirmed": false }
        },
        {
            "txid": TXID_A,
            "vin": [ { "prevout": { "scriptpubkey_address": address, "value": 100000 } } ],
            "vout": [ { "scriptpubkey_address": "tb1qrecipient", "value": 60000 },
                      { "scriptpubkey_address": address, "value": 39000 } ],
            "fee": 1000,
            "status": { "confirmed": true, "block_height": 60000, "block_time": 1714000000 }
        }
    ]))
    .into_response()
}

async fn fees(State(up): State<FakeUpstream>) -> Response {
    if let Some(failure) = up.enter() {
        return failure;
    }
    Json(json!({ "fastestFee": 12, "halfHourFee": 9, "hourFee": 7, "economyFee": 3, "minimumFee": 1 }))
        .into_response()
}

async fn push_tx(State(up): State<FakeUpstream>, headers: HeaderMap, body: String) -> Response {
    if let Some(failure) = up.enter() {
        return failure;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    *up.broadcast.lock().unwrap() = Some((content_type, body));
    format!("{TXID_A}\n").into_response()
}

/// Serve the fake explorer under `/testnet4` on an ephemeral port and return
/// its base URL.
async fn spawn_upstream(upstream: FakeUpstream) -> String {
    let api = Router::new()
        .route("/api/address/{address}", get(address_info))
        .route("/api/address/{address}/utxo", get(address_utxos))
        .route("/api/address/{address}/txs", get(address_txs))
        .route("/api/v1/fees/recommended", get(fees))
        .route("/api/tx", post(push_tx))
        .with_state(upstream);
    let router = Router::new().nest("/testnet4", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake upstream serves");
    });
    format!("http://{addr}/testnet4")
}

fn client_for(base_url: String) -> MempoolClient {
    init_tracing();
    MempoolClient::with_options(
        Network::Testnet4,
        MempoolOptions {
            base_url: Some(base_url),
            timeout: Duration::from_secs(5),
        },
    )
    .expect("client must build")
}

// ==============================================================================
// Success Paths
// ==============================================================================

#[tokio::test]
async fn balance_nets_chain_and_mempool_stats() {
    let client = client_for(spawn_upstream(FakeUpstream::default()).await);
    let log = LogContext::new();

    let balance = client.get_balance(&log, SUBJECT).await.expect("balance");
    assert_eq!(balance.confirmed(), 100_000);
    assert_eq!(balance.unconfirmed(), 20_000);
    assert_eq!(balance.total(), 120_000);

    let url = log.get("upstream_url").expect("upstream url recorded");
    assert!(url
        .as_str()
        .unwrap()
        .ends_with("/testnet4/api/address/tb1qsubject"));
    assert_eq!(log.get("upstream_method"), Some(json!("GET")));
    assert_eq!(log.get("upstream_status"), Some(json!(200)));
    assert!(log.get("upstream_duration_ms").is_some());
    assert!(log.get("upstream_error").is_none());
}

#[tokio::test]
async fn utxos_carry_confirmation_state() {
    let client = client_for(spawn_upstream(FakeUpstream::default()).await);

    let utxos = client
        .get_utxos(&LogContext::new(), SUBJECT)
        .await
        .expect("utxos");
    assert_eq!(utxos.len(), 2);
    assert_eq!(utxos[0].txid.to_string(), TXID_A);
    assert_eq!(utxos[0].vout, 1);
    assert_eq!(utxos[0].value, 39_000);
    assert!(utxos[0].confirmed);
    assert_eq!(utxos[0].block_height, Some(BlockHeight(60_000)));
    assert!(!utxos[1].confirmed);
    assert_eq!(utxos[1].block_height, None);
}

#[tokio::test]
async fn transactions_are_enriched_for_the_queried_address() {
    let client = client_for(spawn_upstream(FakeUpstream::default()).await);

    let txs = client
        .get_transactions(&LogContext::new(), SUBJECT)
        .await
        .expect("transactions");
    assert_eq!(txs.len(), 2);

    let receive = &txs[0];
    assert_eq!(receive.txid.to_string(), TXID_B);
    assert_eq!(receive.direction, Direction::Receive);
    assert_eq!(receive.amount_sats, 20_000);
    assert_eq!(receive.other_addr, "tb1qsender");
    assert!(!receive.confirmed);
    assert_eq!(receive.fee_sats, 200);

    let send = &txs[1];
    assert_eq!(send.direction, Direction::Send);
    assert_eq!(send.amount_sats, 60_000);
    assert_eq!(send.other_addr, "tb1qrecipient");
    assert_eq!(send.block_height, Some(BlockHeight(60_000)));
    assert_eq!(send.block_time, Some(1_714_000_000));
}

#[tokio::test]
async fn fee_rates_decode() {
    let client = client_for(spawn_upstream(FakeUpstream::default()).await);

    let rates = client
        .get_fee_rates(&LogContext::new())
        .await
        .expect("fee rates");
    assert_eq!(rates.fastest_fee, 12);
    assert_eq!(rates.half_hour_fee, 9);
    assert_eq!(rates.hour_fee, 7);
    assert_eq!(rates.economy_fee, 3);
    assert_eq!(rates.minimum_fee, 1);
}

#[tokio::test]
async fn broadcast_posts_plain_text_hex_and_returns_trimmed_txid() {
    let upstream = FakeUpstream::default();
    let client = client_for(spawn_upstream(upstream.clone()).await);
    let log = LogContext::new();

    let txid = client
        .broadcast_tx(&log, "0200000000010100")
        .await
        .expect("broadcast");
    assert_eq!(txid.to_string(), TXID_A);
    assert_eq!(log.get("txid"), Some(json!(TXID_A)));
    assert_eq!(log.get("upstream_method"), Some(json!("POST")));

    let (content_type, body) = upstream
        .broadcast
        .lock()
        .unwrap()
        .clone()
        .expect("upstream saw broadcast");
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "0200000000010100");
}

// ==============================================================================
// Failure Paths
// ==============================================================================

fn assert_upstream_status(result: Result<impl std::fmt::Debug, CoreError>, expected: u16) {
    match result {
        Err(CoreError::Upstream(UpstreamError::Status { status, body })) => {
            assert_eq!(status, expected);
            assert_eq!(body, "upstream says no");
        }
        other => panic!("expected upstream status error, got {other:?}"),
    }
}

#[tokio::test]
async fn every_round_trip_preserves_upstream_status() {
    let upstream = FakeUpstream::failing(503);
    let client = client_for(spawn_upstream(upstream.clone()).await);
    let log = LogContext::new();

    assert_upstream_status(client.get_balance(&log, SUBJECT).await, 503);
    assert_upstream_status(client.get_utxos(&log, SUBJECT).await, 503);
    assert_upstream_status(client.get_transactions(&log, SUBJECT).await, 503);
    assert_upstream_status(client.get_fee_rates(&log).await, 503);
    assert_upstream_status(client.broadcast_tx(&log, "02000000").await, 503);

    assert_eq!(upstream.hits.load(Ordering::SeqCst), 5);
    assert_eq!(log.get("upstream_status"), Some(json!(503)));
    assert!(log
        .get("upstream_error")
        .and_then(|v| v.as_str().map(str::to_owned))
        .is_some_and(|msg| msg.contains("status 503")));
}

#[tokio::test]
async fn rejected_broadcast_keeps_client_error_status() {
    let client = client_for(spawn_upstream(FakeUpstream::failing(400)).await);
    assert_upstream_status(
        client.broadcast_tx(&LogContext::new(), "deadbeef").await,
        400,
    );
}

#[tokio::test]
async fn empty_broadcast_is_rejected_without_a_request() {
    let upstream = FakeUpstream::default();
    let client = client_for(spawn_upstream(upstream.clone()).await);
    let log = LogContext::new();

    let err = client
        .broadcast_tx(&log, "")
        .await
        .expect_err("empty hex must be rejected");
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
    assert!(log.fields().is_empty());
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has local addr");
    drop(listener);

    let client = client_for(format!("http://{addr}"));
    let log = LogContext::new();
    let err = client
        .get_fee_rates(&log)
        .await
        .expect_err("closed port must fail");
    match err {
        CoreError::Upstream(ref upstream @ UpstreamError::Transport(_)) => {
            assert_eq!(upstream.status(), None);
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(log.get("upstream_error").is_some());
    assert!(log.get("upstream_status").is_none());
}

/// Serve a single ad-hoc router on an ephemeral port and return its base URL.
async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake upstream serves");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn undecodable_body_is_an_invalid_response_with_status_and_body() {
    async fn garbage() -> &'static str {
        "<html>maintenance</html>"
    }
    let base = spawn_router(Router::new().route("/api/v1/fees/recommended", get(garbage))).await;
    let client = client_for(base);
    let log = LogContext::new();

    let err = client
        .get_fee_rates(&log)
        .await
        .expect_err("html must not decode");
    match err {
        CoreError::Upstream(UpstreamError::InvalidResponse {
            status,
            ref body,
            ..
        }) => {
            assert_eq!(status, 200);
            assert_eq!(body, "<html>maintenance</html>");
        }
        other => panic!("expected invalid response, got {other:?}"),
    }
    assert_eq!(log.get("upstream_status"), Some(json!(200)));
    assert!(log.get("upstream_error").is_some());
}

#[tokio::test]
async fn non_200_success_status_is_not_accepted() {
    async fn accepted() -> Response {
        (
            StatusCode::ACCEPTED,
            Json(json!({ "fastestFee": 1, "halfHourFee": 1, "hourFee": 1, "economyFee": 1, "minimumFee": 1 })),
        )
            .into_response()
    }
    let base =
        spawn_router(Router::new().route("/api/v1/fees/recommended", get(accepted))).await;
    let client = client_for(base);

    match client.get_fee_rates(&LogContext::new()).await {
        Err(CoreError::Upstream(err @ UpstreamError::Status { .. })) => {
            assert_eq!(err.status(), Some(202));
        }
        other => panic!("expected upstream status error, got {other:?}"),
    }
}

#[tokio::test]
async fn broadcast_reply_that_is_not_a_txid_is_invalid() {
    async fn not_a_txid() -> &'static str {
        "sendrawtransaction RPC error: queued"
    }
    let base = spawn_router(Router::new().route("/api/tx", post(not_a_txid))).await;
    let client = client_for(base);
    let log = LogContext::new();

    let err = client
        .broadcast_tx(&log, "02000000")
        .await
        .expect_err("reply must parse as a txid");
    match err {
        CoreError::Upstream(UpstreamError::InvalidResponse { ref body, .. }) => {
            assert_eq!(body, "sendrawtransaction RPC error: queued");
        }
        other => panic!("expected invalid response, got {other:?}"),
    }
    assert!(log.get("txid").is_none());
}
