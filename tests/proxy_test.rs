//! Integration tests for the forwarding proxy
//!
//! Tests verify:
//! - POST bodies reach the upstream verbatim and replies are relayed
//! - Non-JSON upstream replies are wrapped with the raw text
//! - CORS preflight and headers
//! - 405 for unsupported methods, 502 when the upstream is down

mod common;

use common::{dead_address, start_fake_sheet, start_proxy, FakeSheet};
use serde_json::{json, Value};

#[tokio::test]
async fn test_post_is_forwarded_and_relayed() {
    let (sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let body = json!({
        "action": "SAVE_PENDING",
        "payload": { "id": "PEND-0001-aaaaa", "name": "Ana" }
    });
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/proxy", proxy))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply, json!({ "ok": true, "id": "PEND-0001-aaaaa" }));

    assert_eq!(FakeSheet::pending_ids(&sheet), vec!["PEND-0001-aaaaa"]);
    let received: Value = serde_json::from_str(&sheet.lock().unwrap().requests[0]).unwrap();
    assert_eq!(received, body);
}

#[tokio::test]
async fn test_all_proxy_paths_forward() {
    let (sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;
    let client = reqwest::Client::new();

    for path in ["/", "/api/proxy", "/api/gsheet"] {
        let response = client
            .post(format!("http://{}{}", proxy, path))
            .body(r#"{"action":"LIST_PENDING"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "path {}", path);
    }
    assert_eq!(sheet.lock().unwrap().requests.len(), 3);
}

#[tokio::test]
async fn test_empty_body_forwards_empty_object() {
    let (sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let reply: Value = reqwest::Client::new()
        .post(format!("http://{}/api/proxy", proxy))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reply["ok"], false);
    assert_eq!(sheet.lock().unwrap().requests, vec!["{}".to_string()]);
}

#[tokio::test]
async fn test_get_pings_upstream() {
    let (_sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let reply: Value = reqwest::get(format!("http://{}/api/proxy", proxy))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["ping"], "pong");
}

#[tokio::test]
async fn test_non_json_reply_is_wrapped() {
    let (_sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/text", sheet_addr)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/gsheet", proxy))
        .body(r#"{"action":"LIST_PENDING"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"], "Invalid JSON from upstream");
    assert_eq!(reply["raw"], "<html>Service unavailable</html>");
}

#[tokio::test]
async fn test_preflight_allows_any_origin() {
    let (_sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}/api/proxy", proxy))
        .header("Origin", "https://forms.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn test_cors_header_on_forwarded_reply() {
    let (_sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/proxy", proxy))
        .header("Origin", "https://forms.example.com")
        .body(r#"{"action":"LIST_PENDING"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let (sheet, sheet_addr) = start_fake_sheet().await;
    let proxy = start_proxy(&format!("http://{}/exec", sheet_addr)).await;

    let response = reqwest::Client::new()
        .put(format!("http://{}/api/proxy", proxy))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply, json!({ "ok": false, "error": "Method Not Allowed" }));
    assert!(sheet.lock().unwrap().requests.is_empty());
}

#[tokio::test]
async fn test_dead_upstream_is_bad_gateway() {
    let dead = dead_address().await;
    let proxy = start_proxy(&format!("http://{}/exec", dead)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/proxy", proxy))
        .body(r#"{"action":"LIST_PENDING"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"], "proxy_failed");
    assert!(reply["detail"].is_string());
}

#[tokio::test]
async fn test_health() {
    let proxy = start_proxy("http://127.0.0.1:9/exec").await;
    let text = reqwest::get(format!("http://{}/health", proxy))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "OK");
}
