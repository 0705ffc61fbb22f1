use serde_json::json;

use crate::integration::start_test_server;
use crate::utils::{SILENCE_WINDOW_MS, connect_peers, expect_signal, wait_for_members};

#[tokio::test]
async fn test_peer_leaves_others_stay() {
    let server = start_test_server().await;
    let room_id = server.create_room().await.expect("Failed to create room");

    let mut peers = connect_peers(&server, &room_id, 3)
        .await
        .expect("Failed to connect peers");
    let leaver = peers.remove(1);
    let leaver_id = leaver.peer_id.to_string();

    leaver.close().await.expect("Failed to close leaving peer");

    for peer in peers.iter_mut() {
        expect_signal(peer, "leave", &leaver_id)
            .await
            .expect("Remaining peers should hear the leave");
        peer.expect_silence(SILENCE_WINDOW_MS)
            .await
            .expect("Exactly one leave per departure");
    }
    wait_for_members(&server.service, &room_id, 2)
        .await
        .expect("Two peers should remain");

    // The survivors can still talk, and the departed id is no longer routable
    let p1_id = peers[0].peer_id.to_string();
    peers[0]
        .send_json(&json!({ "type": "offer", "to": leaver_id, "payload": {} }))
        .await
        .expect("Failed to send");
    peers[1]
        .expect_silence(SILENCE_WINDOW_MS)
        .await
        .expect("Offer to a departed peer goes nowhere");

    peers[0]
        .send_json(&json!({ "type": "share-stopped" }))
        .await
        .expect("Failed to send");
    expect_signal(&mut peers[1], "share-stopped", &p1_id)
        .await
        .expect("Survivors should still exchange messages");

    assert!(server.service.registry().contains(&room_id));

    for peer in peers {
        peer.close().await.expect("Failed to close peer");
    }
}
