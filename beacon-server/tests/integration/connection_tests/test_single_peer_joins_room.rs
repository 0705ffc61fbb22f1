use crate::integration::start_test_server;
use crate::utils::{SILENCE_WINDOW_MS, TestClient, wait_for_members};

#[tokio::test]
async fn test_single_peer_joins_room() {
    let server = start_test_server().await;

    let room_id = server.create_room().await.expect("Failed to create room");
    assert_eq!(server.service.registry().member_count(&room_id), Some(0));

    // connect() fails unless the first frame is a welcome carrying our id
    let mut client = TestClient::connect(&server, &room_id)
        .await
        .expect("Failed to connect");

    wait_for_members(&server.service, &room_id, 1)
        .await
        .expect("Peer was not attached");

    // Exactly one welcome, nothing else
    client
        .expect_silence(SILENCE_WINDOW_MS)
        .await
        .expect("Lone peer should receive nothing after welcome");

    client.close().await.expect("Failed to close client");
}
