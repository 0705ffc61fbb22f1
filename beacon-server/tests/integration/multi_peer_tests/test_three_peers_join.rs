use crate::integration::start_test_server;
use crate::utils::{SIGNAL_TIMEOUT_MS, SILENCE_WINDOW_MS, TestClient, wait_for_members};

#[tokio::test]
async fn test_three_peers_join() {
    let server = start_test_server().await;
    let room_id = server.create_room().await.expect("Failed to create room");

    let mut client1 = TestClient::connect(&server, &room_id)
        .await
        .expect("Failed to connect client 1");
    let mut client2 = TestClient::connect(&server, &room_id)
        .await
        .expect("Failed to connect client 2");

    let join = client1.recv(SIGNAL_TIMEOUT_MS).await.expect("join for 2");
    assert_eq!(join["from"], client2.peer_id.to_string());

    let mut client3 = TestClient::connect(&server, &room_id)
        .await
        .expect("Failed to connect client 3");

    // Each pre-existing member hears exactly one join for client 3
    for (client, name) in [(&mut client1, "1"), (&mut client2, "2")] {
        let join = client
            .recv(SIGNAL_TIMEOUT_MS)
            .await
            .unwrap_or_else(|_| panic!("Client {} missed join", name));
        assert_eq!(join["type"], "join");
        assert_eq!(join["from"], client3.peer_id.to_string());
        client
            .expect_silence(SILENCE_WINDOW_MS)
            .await
            .unwrap_or_else(|_| panic!("Client {} got a duplicate", name));
    }
    client3
        .expect_silence(SILENCE_WINDOW_MS)
        .await
        .expect("Newcomer gets no join for itself");

    wait_for_members(&server.service, &room_id, 3)
        .await
        .expect("All three should be members");

    let ids = [&client1.peer_id, &client2.peer_id, &client3.peer_id];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);

    client1.close().await.expect("Failed to close client 1");
    client2.close().await.expect("Failed to close client 2");
    client3.close().await.expect("Failed to close client 3");
}
