//! Test fixtures: an in-process stand-in for the spreadsheet backend and a
//! proxy in front of it.

#![allow(dead_code)]

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Spreadsheet backend state
#[derive(Default)]
pub struct FakeSheet {
    /// Pending drafts as received (full JSON payloads)
    pub pending: Vec<Value>,
    /// Closed cases
    pub closed: Vec<Value>,
    /// Raw bodies received, in order
    pub requests: Vec<String>,
    /// Reply ok:false to CLOSE_CASE
    pub reject_close: bool,
}

pub type SharedSheet = Arc<Mutex<FakeSheet>>;

impl FakeSheet {
    pub fn pending_ids(sheet: &SharedSheet) -> Vec<String> {
        sheet
            .lock()
            .unwrap()
            .pending
            .iter()
            .filter_map(|d| d["id"].as_str().map(str::to_string))
            .collect()
    }
}

async fn handle_post(State(sheet): State<SharedSheet>, body: String) -> Json<Value> {
    let mut sheet = sheet.lock().unwrap();
    sheet.requests.push(body.clone());

    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return Json(json!({ "ok": false, "error": "bad body" })),
    };
    let id = request["id"].as_str().unwrap_or_default().to_string();

    let reply = match request["action"].as_str().unwrap_or_default() {
        "SAVE_PENDING" => {
            let payload = request["payload"].clone();
            let pid = payload["id"].as_str().unwrap_or_default().to_string();
            sheet.pending.retain(|d| d["id"] != pid.as_str());
            sheet.pending.push(payload);
            json!({ "ok": true, "id": pid })
        }
        "LIST_PENDING" => {
            let rows: Vec<Value> = sheet
                .pending
                .iter()
                .map(|d| {
                    json!({
                        "id": d["id"],
                        "ts_humano": d["savedAt"],
                        "nombre": d["name"],
                        "area": d["area"],
                        "supervisor": d["supervisor"],
                        "pct_inicial": d["initialCompliancePct"],
                    })
                })
                .collect();
            json!({ "ok": true, "rows": rows })
        }
        "GET_PENDING" => match sheet.pending.iter().find(|d| d["id"] == id.as_str()) {
            Some(draft) => json!({ "ok": true, "draft": draft }),
            None => json!({ "ok": false, "error": "not found" }),
        },
        "DELETE_PENDING" => {
            sheet.pending.retain(|d| d["id"] != id.as_str());
            json!({ "ok": true })
        }
        "CLOSE_CASE" => {
            if sheet.reject_close {
                json!({ "ok": false, "error": "sheet is locked" })
            } else {
                let payload = request["payload"].clone();
                sheet.closed.push(payload);
                json!({ "ok": true })
            }
        }
        other => json!({ "ok": false, "error": format!("unknown action {}", other) }),
    };

    Json(reply)
}

async fn handle_ping() -> Json<Value> {
    Json(json!({ "ok": true, "ping": "pong" }))
}

async fn handle_text() -> &'static str {
    "<html>Service unavailable</html>"
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Start the fake backend. `/exec` speaks the action protocol, `/text`
/// answers every request with HTML.
pub async fn start_fake_sheet() -> (SharedSheet, SocketAddr) {
    let sheet: SharedSheet = Arc::new(Mutex::new(FakeSheet::default()));
    let app = Router::new()
        .route("/exec", get(handle_ping).post(handle_post))
        .route("/text", get(handle_text).post(handle_text))
        .with_state(sheet.clone());

    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (sheet, addr)
}

/// Start the proxy forwarding to `upstream_url`; returns its address
pub async fn start_proxy(upstream_url: &str) -> SocketAddr {
    let state = socv3::proxy::ProxyState::new(upstream_url, Duration::from_secs(5)).unwrap();
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        axum::serve(listener, socv3::proxy::router(state)).await.unwrap();
    });
    addr
}

/// Address nobody listens on
pub async fn dead_address() -> SocketAddr {
    let (listener, addr) = bind().await;
    drop(listener);
    addr
}
