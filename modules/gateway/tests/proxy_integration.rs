use std::net::SocketAddr;

use hopwire_downstream::DownstreamConfig;
use hopwire_errors::INTERNAL_ERROR_MESSAGE;
use hopwire_errors::test_support::AppHarness;
use hopwire_gateway::test_support::MockDownstream;
use hopwire_gateway::{DownstreamClientConfig, GatewayConfig};
use http::Method;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Run the real downstream service on a random local port.
async fn spawn_downstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = hopwire_downstream::router(&DownstreamConfig::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A port nothing listens on.
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Accepts connections and never answers.
async fn spawn_silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

fn gateway(base_url: String) -> AppHarness {
    gateway_with(DownstreamClientConfig {
        base_url,
        ..DownstreamClientConfig::default()
    })
}

fn gateway_with(downstream: DownstreamClientConfig) -> AppHarness {
    let cfg = GatewayConfig {
        downstream,
        ..GatewayConfig::default()
    };
    AppHarness::new(hopwire_gateway::router(&cfg).unwrap())
}

async fn real_gateway() -> AppHarness {
    let addr = spawn_downstream().await;
    gateway(format!("http://{addr}/api/v1"))
}

// ---------------------------------------------------------------------------
// Against the real downstream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_success_is_tagged_with_gateway_name() {
    let body: Value = real_gateway()
        .await
        .get("/api/v1/proxy/success")
        .expect_ok()
        .await;
    assert_eq!(body["message"], "Operation completed successfully");
    assert_eq!(body["service"], "downstream-service");
    assert_eq!(body["proxiedBy"], "gateway");
}

#[tokio::test]
async fn proxy_not_found_keeps_404_and_downstream_status() {
    let resp = real_gateway()
        .await
        .get("/api/v1/proxy/not-found")
        .expect(404)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        "downstream-service returned an error: User not found"
    );
    assert_eq!(env.error.path, "/api/v1/proxy/not-found");

    let details = env.error.details.unwrap();
    assert_eq!(details["serviceName"], "downstream-service");
    assert_eq!(details["downstreamStatusCode"], 404);
    let raw = details["downstreamError"].as_str().unwrap();
    assert!(raw.contains("RESOURCE_NOT_FOUND"));
    resp.assert_header("x-error-source", "downstream");
}

#[tokio::test]
async fn proxy_business_error_is_answered_as_400() {
    let resp = real_gateway()
        .await
        .get("/api/v1/proxy/business-error")
        .expect(400)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(env.error.details.unwrap()["downstreamStatusCode"], 422);
}

#[tokio::test]
async fn proxy_validation_error_is_answered_as_400() {
    let resp = real_gateway()
        .await
        .get("/api/v1/proxy/validation-error")
        .expect(400)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        "downstream-service returned an error: Invalid email format"
    );
}

#[tokio::test]
async fn proxy_external_service_error_is_answered_as_502() {
    let resp = real_gateway()
        .await
        .get("/api/v1/proxy/external-service-error")
        .expect(502)
        .await;
    resp.error("DOWNSTREAM_SERVICE_ERROR");
}

#[tokio::test]
async fn proxy_internal_error_carries_only_the_generic_downstream_message() {
    let resp = real_gateway()
        .await
        .get("/api/v1/proxy/internal-error")
        .expect(500)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        format!("downstream-service returned an error: {INTERNAL_ERROR_MESSAGE}")
    );
    assert!(!resp.text().contains("database"));
}

#[tokio::test]
async fn proxy_validate_user_forwards_the_body() {
    let h = real_gateway().await;

    let ok: Value = h
        .post("/api/v1/proxy/validate-user")
        .json(&json!({"email": "ada@example.com", "name": "Ada"}))
        .expect_ok()
        .await;
    assert_eq!(ok["message"], "User validation successful");

    let resp = h
        .post("/api/v1/proxy/validate-user")
        .json(&json!({"email": "nope", "name": "Ada"}))
        .expect(400)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(env.error.details.unwrap()["downstreamStatusCode"], 400);
}

#[tokio::test]
async fn process_order_validates_user_downstream() {
    let body: Value = real_gateway()
        .await
        .post("/api/v1/process-order")
        .json(&json!({"email": "ada@example.com", "productId": "P-7", "name": "Ada"}))
        .expect_ok()
        .await;
    assert_eq!(body["message"], "Order processed successfully");
    assert!(body["orderId"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(body["userValidation"]["email"], "ada@example.com");
}

#[tokio::test]
async fn process_order_without_name_fails_downstream_validation() {
    let resp = real_gateway()
        .await
        .post("/api/v1/process-order")
        .json(&json!({"email": "ada@example.com", "productId": "P-7"}))
        .expect(400)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        "downstream-service returned an error: Name cannot be empty"
    );
}

// ---------------------------------------------------------------------------
// Local failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn process_order_with_empty_email_never_reaches_downstream() {
    let mock = MockDownstream::start().await;
    let h = gateway(mock.base_url("/api/v1"));

    let resp = h
        .post("/api/v1/process-order")
        .json(&json!({"email": "", "productId": "P-7", "name": "Ada"}))
        .expect(400)
        .await;
    let env = resp.error("VALIDATION_ERROR");
    let details = env.error.details.unwrap();
    assert_eq!(details["field"], "email");
    assert_eq!(details["reason"], "Email field cannot be empty");
    resp.assert_header("x-error-source", "local");

    assert!(mock.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn process_order_with_missing_product_id_never_reaches_downstream() {
    let mock = MockDownstream::start().await;
    let h = gateway(mock.base_url("/api/v1"));

    let resp = h
        .post("/api/v1/process-order")
        .json(&json!({"email": "ada@example.com"}))
        .expect(400)
        .await;
    let env = resp.error("VALIDATION_ERROR");
    assert_eq!(env.error.details.unwrap()["field"], "productId");
    assert!(mock.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn local_errors_use_local_kinds() {
    let h = gateway(format!("http://{}/api/v1", closed_port().await));

    let resp = h
        .get("/api/v1/local-validation-error")
        .expect(400)
        .await;
    let env = resp.error("VALIDATION_ERROR");
    assert_eq!(env.error.details.unwrap()["field"], "requestType");

    let resp = h
        .get("/api/v1/local-business-error")
        .expect(422)
        .await;
    let env = resp.error("BUSINESS_LOGIC_ERROR");
    assert_eq!(
        env.error.message,
        "User is not authorized to perform this action"
    );
}

#[tokio::test]
async fn unknown_gateway_route_is_local_not_found() {
    let h = gateway(format!("http://{}/api/v1", closed_port().await));
    let resp = h.get("/api/v1/proxy/unknown").expect(404).await;
    let env = resp.error("RESOURCE_NOT_FOUND");
    assert_eq!(env.error.details.unwrap()["resourceType"], "Endpoint");
}

// ---------------------------------------------------------------------------
// Transport failures and odd downstream answers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_downstream_is_500_with_transport_text() {
    let h = gateway(format!("http://{}/api/v1", closed_port().await));

    for path in ["/api/v1/proxy/success", "/api/v1/proxy/not-found"] {
        let resp = h.get(path).expect(500).await;
        let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
        assert_eq!(
            env.error.message,
            "Failed to communicate with downstream-service"
        );
        let details = env.error.details.unwrap();
        assert_eq!(details["downstreamStatusCode"], 500);
        let raw = details["downstreamError"].as_str().unwrap();
        assert!(raw.contains("error sending request"), "got: {raw}");
    }
}

#[tokio::test]
async fn silent_downstream_times_out() {
    let addr = spawn_silent_listener().await;
    let h = gateway_with(DownstreamClientConfig {
        base_url: format!("http://{addr}/api/v1"),
        request_timeout_secs: 1,
        ..DownstreamClientConfig::default()
    });

    let resp = h.get("/api/v1/proxy/success").expect(500).await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    let raw = env.error.details.unwrap()["downstreamError"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(raw.contains("timed out"), "got: {raw}");
}

#[tokio::test]
async fn non_json_success_body_is_a_transport_failure() {
    let mock = MockDownstream::start().await;
    mock.text("GET", "/api/v1/success", 200, "all good");
    let h = gateway(mock.base_url("/api/v1"));

    let resp = h.get("/api/v1/proxy/success").expect(500).await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        "Failed to communicate with downstream-service"
    );
    let details = env.error.details.unwrap();
    assert!(details["downstreamError"]
        .as_str()
        .unwrap()
        .contains("invalid JSON"));
}

#[tokio::test]
async fn non_envelope_error_body_uses_unknown_message() {
    let mock = MockDownstream::start().await;
    mock.text("GET", "/api/v1/not-found", 503, "<html>unavailable</html>");
    let h = gateway(mock.base_url("/api/v1"));

    let resp = h.get("/api/v1/proxy/not-found").expect(500).await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(
        env.error.message,
        "downstream-service returned an error: Unknown error from downstream service"
    );
    let details = env.error.details.unwrap();
    assert_eq!(details["downstreamStatusCode"], 503);
    assert_eq!(details["downstreamError"], "<html>unavailable</html>");
}

// ---------------------------------------------------------------------------
// Correlation and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn outbound_call_carries_a_fresh_request_id() {
    let mock = MockDownstream::start().await;
    mock.json(
        "GET",
        "/api/v1/not-found",
        404,
        json!({"error": {"code": "RESOURCE_NOT_FOUND", "message": "User not found"}}),
    );
    let h = gateway(mock.base_url("/api/v1"));

    let resp = h
        .get("/api/v1/proxy/not-found")
        .header("x-request-id", "inbound-1")
        .expect(404)
        .await;
    let env = resp.error("DOWNSTREAM_SERVICE_ERROR");
    assert_eq!(env.error.request_id, "inbound-1");
    resp.assert_header("x-request-id", "inbound-1");

    let seen = mock.recorded_requests().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].uri, "/api/v1/not-found");
    let outbound = seen[0].header("x-request-id").unwrap();
    assert!(!outbound.is_empty());
    assert_ne!(outbound, "inbound-1");
}

#[tokio::test]
async fn validate_user_body_is_forwarded_verbatim() {
    let mock = MockDownstream::start().await;
    mock.json(
        "POST",
        "/api/v1/validate-user",
        200,
        json!({"message": "User validation successful"}),
    );
    let h = gateway(mock.base_url("/api/v1"));

    let _: Value = h
        .post("/api/v1/process-order")
        .json(&json!({"email": "ada@example.com", "productId": "P-1"}))
        .expect_ok()
        .await;

    let seen = mock.recorded_requests().await;
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].json(), json!({"email": "ada@example.com", "name": ""}));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let h = gateway(format!("http://{}/api/v1", closed_port().await));

    let resp = h
        .request(Method::OPTIONS, "/api/v1/proxy/success")
        .header("origin", "http://localhost:4200")
        .header("access-control-request-method", "GET")
        .send()
        .await;
    assert!(resp.status().is_success());
    resp.assert_header("access-control-allow-origin", "http://localhost:4200");
}
