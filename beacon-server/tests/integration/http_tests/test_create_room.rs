use beacon_core::RoomCreated;
use std::collections::HashSet;

use crate::integration::start_test_server;

#[tokio::test]
async fn test_create_room() {
    let server = start_test_server().await;

    let response = reqwest::Client::new()
        .post(server.http_url("/room"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("POST /room failed");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let body: serde_json::Value = response.json().await.expect("Invalid JSON body");
    let room_id = body["roomId"].as_str().expect("roomId should be a string");
    assert_eq!(room_id.len(), 6);
    assert!(room_id.bytes().all(|b| b.is_ascii_digit()));

    let room_id = room_id.parse().expect("roomId should parse");
    assert!(server.service.registry().contains(&room_id));
    assert_eq!(server.service.registry().member_count(&room_id), Some(0));
}

#[tokio::test]
async fn test_create_room_returns_fresh_ids() {
    let server = start_test_server().await;
    let client = reqwest::Client::new();

    let mut seen = HashSet::new();
    for _ in 0..20 {
        let created: RoomCreated = client
            .post(server.http_url("/room"))
            .send()
            .await
            .expect("POST /room failed")
            .json()
            .await
            .expect("Invalid body");
        seen.insert(created.room_id);
    }

    // Empty rooms may be reissued, but every issued id is registered
    for room_id in &seen {
        assert!(server.service.registry().contains(room_id));
    }
    assert_eq!(server.service.registry().room_count(), seen.len());
}

#[tokio::test]
async fn test_create_room_preflight() {
    let server = start_test_server().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.http_url("/room"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("OPTIONS /room failed");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert_eq!(server.service.registry().room_count(), 0);
}
