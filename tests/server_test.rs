//! Invoke server tests against a live mock application.

use serde_json::Value;
use std::time::Duration;

use edge_adapter::config::OriginPathConfig;

mod common;

fn origin(pattern: &str, rewrite: Option<&str>) -> OriginPathConfig {
    OriginPathConfig {
        pattern: pattern.to_string(),
        rewrite: rewrite.map(str::to_string),
    }
}

async fn invoke(server: &common::TestServer, event: &Value) -> reqwest::Response {
    common::client()
        .post(server.url("/invoke"))
        .json(event)
        .send()
        .await
        .expect("invoke server unreachable")
}

#[tokio::test]
async fn test_dynamic_request_reaches_application() {
    let app = common::start_mock_app().await;
    let server = common::start_server(common::config_for(app)).await;

    let res = common::client()
        .post(server.url("/invoke"))
        .header("x-request-id", "trace-1")
        .json(&common::raw_event("/products", "page=2"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-request-id"], "trace-1");
    assert_eq!(res.headers()["x-edge-wait-for-background"], "true");

    let result: Value = res.json().await.unwrap();
    assert_eq!(result["status"], "200");
    assert_eq!(result["bodyEncoding"], "text");
    assert_eq!(result["headers"]["set-cookie"].as_array().unwrap().len(), 2);
    assert_eq!(result["headers"]["x-app"][0]["value"], "mock");

    let echoed: Value = serde_json::from_str(result["body"].as_str().unwrap()).unwrap();
    assert_eq!(echoed["method"], "GET");
    assert_eq!(echoed["path"], "/products");
    assert_eq!(echoed["query"], "page=2");
    assert_eq!(echoed["host"], "shop.example.com");
    assert_eq!(echoed["request_id"], "trace-1");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_generated_request_id_is_forwarded() {
    let app = common::start_mock_app().await;
    let server = common::start_server(common::config_for(app)).await;

    let res = invoke(&server, &common::raw_event("/", "")).await;
    let request_id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!request_id.is_empty());

    let result: Value = res.json().await.unwrap();
    let echoed: Value = serde_json::from_str(result["body"].as_str().unwrap()).unwrap();
    assert_eq!(echoed["request_id"], request_id.as_str());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_origin_paths_pass_through() {
    let app = common::start_mock_app().await;
    let mut config = common::config_for(app);
    config.origin_paths = vec![
        origin("^/static/", None),
        origin(r"^/v\d+/(.*)$", Some("/$1")),
    ];
    let server = common::start_server(config).await;

    let res = invoke(&server, &common::raw_event("/static/app.js", "v=3")).await;
    assert_eq!(res.headers()["x-edge-wait-for-background"], "false");
    let result: Value = res.json().await.unwrap();
    assert_eq!(result["uri"], "/static/app.js");
    assert_eq!(result["querystring"], "v=3");
    assert_eq!(result["clientIp"], "203.0.113.178");
    assert_eq!(result["headers"]["host"][0]["key"], "Host");

    let result: Value = invoke(&server, &common::raw_event("/v2/app.js", ""))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["uri"], "/app.js");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_application_status_is_projected() {
    let app = common::start_mock_app().await;
    let server = common::start_server(common::config_for(app)).await;

    let result: Value = invoke(&server, &common::raw_event("/fail", ""))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["status"], "503");
    assert_eq!(result["body"], "maintenance");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_application_becomes_500() {
    let mut config = edge_adapter::AdapterConfig::default();
    config.server.app_url = "http://127.0.0.1:1".to_string();
    let server = common::start_server(config).await;

    let res = invoke(&server, &common::raw_event("/cart", "")).await;
    assert_eq!(res.status(), 200);
    let result: Value = res.json().await.unwrap();
    assert_eq!(result["status"], "500");
    assert_eq!(result["headers"], serde_json::json!({}));
    assert!(!result["body"].as_str().unwrap().is_empty());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_slow_application_becomes_500() {
    let app = common::start_mock_app().await;
    let mut config = common::config_for(app);
    config.server.request_timeout_secs = 1;
    let server = common::start_server(config).await;

    let res = invoke(&server, &common::raw_event("/slow", "")).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-edge-wait-for-background"], "true");

    let result: Value = res.json().await.unwrap();
    assert_eq!(result["status"], "500");
    assert_eq!(result["headers"], serde_json::json!({}));
    assert_eq!(result["bodyEncoding"], "text");
    assert_eq!(result["body"], "application did not respond within 1s");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_config_reload_applies_app_url() {
    let app = common::start_mock_app().await;
    let config = common::config_for(app);
    let server = common::start_server(config.clone()).await;

    let result: Value = invoke(&server, &common::raw_event("/products", ""))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["status"], "200");

    let mut next = config.clone();
    next.server.app_url = "http://127.0.0.1:1".to_string();
    server.config_updates.send(next).unwrap();

    let mut reloaded = false;
    for _ in 0..40 {
        let result: Value = invoke(&server, &common::raw_event("/products", ""))
            .await
            .json()
            .await
            .unwrap();
        if result["status"] == "500" {
            reloaded = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(reloaded, "new app_url was not applied");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_config_reload_swaps_routing() {
    let app = common::start_mock_app().await;
    let config = common::config_for(app);
    let server = common::start_server(config.clone()).await;

    let result: Value = invoke(&server, &common::raw_event("/products", ""))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["status"], "200");

    let mut next = config.clone();
    next.origin_paths = vec![origin("^/products", None)];
    server.config_updates.send(next).unwrap();

    let mut reloaded = false;
    for _ in 0..40 {
        let result: Value = invoke(&server, &common::raw_event("/products", ""))
            .await
            .json()
            .await
            .unwrap();
        if result["uri"] == "/products" {
            reloaded = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(reloaded, "origin path was not applied");

    // A config whose adapter cannot be built is rejected.
    let mut broken = config.clone();
    broken.origin_paths = vec![origin("^/products(", None)];
    server.config_updates.send(broken).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let result: Value = invoke(&server, &common::raw_event("/products", ""))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["uri"], "/products");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_bad_payloads() {
    let app = common::start_mock_app().await;
    let server = common::start_server(common::config_for(app)).await;
    let client = common::client();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = client
        .post(server.url("/invoke"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let app = common::start_mock_app().await;
    let server = common::start_server(common::config_for(app)).await;

    server.shutdown.trigger();
    let outcome = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(outcome.unwrap().is_ok());
}
