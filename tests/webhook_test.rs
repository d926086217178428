use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use signal_relay::{
    error::RelayError,
    handlers::router,
    services::{sign, OrderRelay},
    types::{Config, TimeInForce},
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tower::ServiceExt;

const API_KEY: &str = "test-api-key";
const API_SECRET: &str = "test-api-secret";

#[derive(Debug, Clone)]
struct CapturedRequest {
    headers: HeaderMap,
    body: String,
}

#[derive(Clone)]
struct FakeExchange {
    reply: Value,
    delay: Duration,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn create_order(
    State(exchange): State<FakeExchange>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    exchange.captured.lock().unwrap().push(CapturedRequest {
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    });
    tokio::time::sleep(exchange.delay).await;
    Json(exchange.reply.clone())
}

// in-process stand-in for the exchange, returns its base url and the request log
async fn spawn_exchange(reply: Value, delay: Duration) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v5/order/create", post(create_order))
        .with_state(FakeExchange {
            reply,
            delay,
            captured: captured.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn create_test_config(api_url: String, timeout: Duration) -> Config {
    Config {
        api_url,
        api_key: API_KEY.to_string(),
        api_secret: API_SECRET.to_string(),
        recv_window: 5000,
        request_timeout: timeout,
        time_in_force: TimeInForce::GoodTillCancel,
    }
}

fn accepted_reply() -> Value {
    json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"orderId": "1321003749386327552", "orderLinkId": ""},
        "retExtInfo": {},
        "time": 1672211918471u64
    })
}

async fn post_webhook(relay: OrderRelay, body: &str) -> (StatusCode, Value) {
    let response = router(relay)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[cfg(test)]
mod webhook_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_alert_is_signed_and_relayed() {
        let (url, captured) = spawn_exchange(accepted_reply(), Duration::ZERO).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_secs(5))).unwrap();

        let (status, body) =
            post_webhook(relay, r#"{"action":"buy","symbol":"BINANCE:BTCUSDT","quantity":10}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["result"]["result"]["orderId"], json!("1321003749386327552"));
        assert_eq!(body["order"]["symbol"], json!("BTCUSDT"));

        let requests = captured.lock().unwrap().clone();
        assert_eq!(requests.len(), 1, "exactly one attempt is made");
        let request = &requests[0];

        assert_eq!(
            request.body,
            r#"{"category":"linear","symbol":"BTCUSDT","side":"Buy","orderType":"Market","qty":"10","timeInForce":"GTC"}"#
        );

        let header = |name: &str| request.headers.get(name).unwrap().to_str().unwrap().to_string();
        assert_eq!(header("x-bapi-api-key"), API_KEY);
        assert_eq!(header("x-bapi-recv-window"), "5000");
        assert_eq!(header("x-bapi-sign-type"), "2");
        assert_eq!(header("content-type"), "application/json");

        // what the exchange checks: the signature over the bytes it actually received
        let expected = sign(
            API_SECRET,
            &header("x-bapi-timestamp"),
            API_KEY,
            "5000",
            &request.body,
        )
        .unwrap();
        assert_eq!(header("x-bapi-sign"), expected);
    }

    #[tokio::test]
    async fn test_exchange_rejection_renders_failure() {
        let reply = json!({"retCode": 10001, "retMsg": "params error: qty invalid", "result": {}, "retExtInfo": {}, "time": 1u64});
        let (url, _) = spawn_exchange(reply, Duration::ZERO).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_secs(5))).unwrap();

        let (status, body) =
            post_webhook(relay, r#"{"action":"sell","symbol":"ETHUSDT","quantity":"0.001"}"#).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["kind"], json!("exchange"));
        assert_eq!(body["code"], json!(10001));
        assert!(body["error"].as_str().unwrap().contains("qty invalid"));
    }

    #[tokio::test]
    async fn test_exchange_rejection_is_typed() {
        let reply = json!({"retCode": 110007, "retMsg": "ab not enough for new order"});
        let (url, _) = spawn_exchange(reply, Duration::ZERO).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_secs(5))).unwrap();

        let err = relay
            .relay(&json!({"action": "buy", "symbol": "BTCUSDT", "quantity": 1}))
            .await
            .unwrap_err();

        match err {
            RelayError::Exchange { code, message } => {
                assert_eq!(code, 110007);
                assert_eq!(message, "ab not enough for new order");
            }
            other => panic!("expected exchange error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_exchange_is_a_transport_failure() {
        let relay = OrderRelay::new(create_test_config(unreachable_url().await, Duration::from_secs(2))).unwrap();

        let (status, body) =
            post_webhook(relay, r#"{"action":"buy","symbol":"BTCUSDT","quantity":1}"#).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["kind"], json!("transport"));
    }

    #[tokio::test]
    async fn test_slow_exchange_times_out() {
        let (url, _) = spawn_exchange(accepted_reply(), Duration::from_secs(3)).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_millis(200))).unwrap();

        let err = relay
            .relay(&json!({"action": "buy", "symbol": "BTCUSDT", "quantity": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport { timed_out: true, .. }), "got {:?}", err);

        let (status, body) = post_webhook(relay, r#"{"action":"buy","symbol":"BTCUSDT","quantity":1}"#).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["kind"], json!("transport"));
    }

    #[tokio::test]
    async fn test_invalid_alert_never_reaches_exchange() {
        let (url, captured) = spawn_exchange(accepted_reply(), Duration::ZERO).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_secs(5))).unwrap();

        let (status, body) = post_webhook(relay, r#"{"action":"buy","symbol":"BTCUSDT"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["kind"], json!("validation"));
        assert!(body["error"].as_str().unwrap().contains("quantity"));
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_client_error() {
        let (url, captured) = spawn_exchange(accepted_reply(), Duration::ZERO).await;
        let relay = OrderRelay::new(create_test_config(url, Duration::from_secs(5))).unwrap();

        let (status, body) = post_webhook(relay, r#"{"action":"buy","#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["kind"], json!("bad_request"));
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_post_is_method_not_allowed() {
        let relay = OrderRelay::new(create_test_config(unreachable_url().await, Duration::from_secs(1))).unwrap();

        let response = router(relay)
            .oneshot(Request::builder().method("GET").uri("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let relay = OrderRelay::new(create_test_config(unreachable_url().await, Duration::from_secs(1))).unwrap();

        let response = router(relay)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/webhook")
                    .header("origin", "https://alerts.example.com")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success(), "preflight got {}", response.status());
        assert!(response.headers().contains_key("access-control-allow-origin"));
        assert!(response.headers().contains_key("access-control-allow-methods"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let relay = OrderRelay::new(create_test_config(unreachable_url().await, Duration::from_secs(1))).unwrap();

        let response = router(relay)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], json!("healthy"));
    }

    #[test]
    fn test_dry_run_prepare_signs_without_sending() {
        let relay = OrderRelay::new(create_test_config("http://127.0.0.1:9".to_string(), Duration::from_secs(1))).unwrap();
        let order = relay
            .build_order(&json!({"action": "sell", "symbol": "SOLUSDT", "quantity": "2"}))
            .unwrap();

        let signed = tokio_test::assert_ok!(relay.client().prepare(&order));
        assert_eq!(signed.body, serde_json::to_string(&order).unwrap());
        assert_eq!(
            signed.signature,
            sign(API_SECRET, &signed.timestamp, API_KEY, &signed.recv_window, &signed.body).unwrap()
        );
    }
}
