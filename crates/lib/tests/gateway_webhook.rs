//! Integration test: start the gateway against a mock Webex API on a free port,
//! deliver webhooks over HTTP, and check the acknowledgment and outbound calls.
//! The server task is left running when the test ends.

use hears::config::Config;
use hears::gateway;
use mockito::Matcher;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// BOT_ACCESS_TOKEN and WEBEX_API_BASE override the test config and would point
/// the gateway at a real Webex account; skip rather than call it.
fn webex_env_overrides_set() -> bool {
    ["BOT_ACCESS_TOKEN", "WEBEX_API_BASE"]
        .iter()
        .any(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty()))
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

fn temp_config_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hears-gateway-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create config dir");
    let config_path = dir.join("config.json");
    std::fs::File::create(&config_path)
        .and_then(|mut f| f.write_all(b"{}"))
        .expect("write config.json");
    config_path
}

async fn mock_json(
    server: &mut mockito::ServerGuard,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock(method, path)
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Start the gateway and wait for the health probe. Returns the base URL.
async fn start_gateway(api_base_url: String) -> String {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();
    config.webex.bot_token = Some("test-token".to_string());
    config.webex.api_base_url = api_base_url;
    let config_path = temp_config_path();

    tokio::spawn(async move {
        let _ = gateway::run_gateway(config, config_path).await;
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(format!("{}/", base)).send().await {
            if resp.status().is_success() {
                let health: serde_json::Value = resp.json().await.expect("parse health JSON");
                assert_eq!(health.get("runtime").and_then(|v| v.as_str()), Some("running"));
                assert_eq!(health.get("commands").and_then(|v| v.as_u64()), Some(4));
                return base;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway at {} did not become healthy within 5s", base);
}

fn delivery(message_id: &str) -> serde_json::Value {
    json!({
        "id": "wh-1",
        "name": "hears",
        "resource": "messages",
        "event": "created",
        "data": {
            "id": message_id,
            "personId": "p1",
            "roomId": "room-1",
            "roomType": "direct"
        }
    })
}

#[tokio::test]
async fn greeting_delivery_replies_in_room() {
    if webex_env_overrides_set() {
        eprintln!("skipping: BOT_ACCESS_TOKEN or WEBEX_API_BASE is set");
        return;
    }
    let mut server = mockito::Server::new_async().await;
    let _me = mock_json(
        &mut server,
        "GET",
        "/people/me",
        json!({ "id": "bot", "emails": ["bot@webex.bot"], "displayName": "Hears" }),
    )
    .await;
    let _message = mock_json(
        &mut server,
        "GET",
        "/messages/m1",
        json!({ "id": "m1", "text": "안녕", "personEmail": "kim@example.com" }),
    )
    .await;
    let _person = mock_json(
        &mut server,
        "GET",
        "/people/p1",
        json!({ "id": "p1", "emails": ["kim@example.com"], "displayName": "김철수" }),
    )
    .await;
    let send = server
        .mock("POST", "/messages")
        .match_body(Matcher::Json(json!({
            "roomId": "room-1",
            "text": "안녕하세요! 김철수님. 무엇을 도와드릴까요?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "out-1", "roomId": "room-1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let base = start_gateway(server.url()).await;
    let ack: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/webex-bot/webhook", base))
        .json(&delivery("m1"))
        .send()
        .await
        .expect("post webhook")
        .json()
        .await
        .expect("parse ack");

    assert_eq!(ack, json!({ "status": "success", "command": "안녕" }));
    send.assert_async().await;
}

#[tokio::test]
async fn own_message_delivery_is_ignored() {
    if webex_env_overrides_set() {
        eprintln!("skipping: BOT_ACCESS_TOKEN or WEBEX_API_BASE is set");
        return;
    }
    let mut server = mockito::Server::new_async().await;
    let _me = mock_json(
        &mut server,
        "GET",
        "/people/me",
        json!({ "id": "bot", "emails": ["bot@webex.bot"] }),
    )
    .await;
    let _message = mock_json(
        &mut server,
        "GET",
        "/messages/m2",
        json!({ "id": "m2", "text": "안녕하세요!", "personEmail": "bot@webex.bot" }),
    )
    .await;
    let send = server
        .mock("POST", "/messages")
        .expect(0)
        .create_async()
        .await;

    let base = start_gateway(server.url()).await;
    let ack: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/webex-bot/webhook", base))
        .json(&delivery("m2"))
        .send()
        .await
        .expect("post webhook")
        .json()
        .await
        .expect("parse ack");

    assert_eq!(ack.get("status").and_then(|v| v.as_str()), Some("ignored"));
    send.assert_async().await;
}

#[tokio::test]
async fn undecodable_delivery_still_gets_ok_ack() {
    if webex_env_overrides_set() {
        eprintln!("skipping: BOT_ACCESS_TOKEN or WEBEX_API_BASE is set");
        return;
    }
    let server = mockito::Server::new_async().await;
    let base = start_gateway(server.url()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/webex-bot/webhook", base))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .expect("post webhook");

    assert!(resp.status().is_success());
    let ack: serde_json::Value = resp.json().await.expect("parse ack");
    assert_eq!(ack.get("status").and_then(|v| v.as_str()), Some("error"));
}
