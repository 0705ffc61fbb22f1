use crate::error::RelayError;
use crate::signaling::SignalingService;
use crate::transport::{PeerSession, PeerState};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use beacon_core::RoomId;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

const CLOSE_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(rename = "roomId")]
    room_id: Option<String>,
}

/// `GET /ws?roomId=<id>`. Unknown rooms are refused before the upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(service): State<SignalingService>,
) -> Result<impl IntoResponse, RelayError> {
    let room_id = parse_room_id(params.room_id.as_deref()).and_then(|room_id| {
        service.ensure_room(&room_id)?;
        Ok(room_id)
    });

    let room_id = match room_id {
        Ok(room_id) => room_id,
        Err(e) => {
            warn!("Rejecting WebSocket upgrade: {}", e);
            return Err(e);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, room_id, service)))
}

fn parse_room_id(raw: Option<&str>) -> Result<RoomId, RelayError> {
    match raw {
        None | Some("") => Err(RelayError::MissingRoomId),
        Some(raw) => Ok(raw.parse()?),
    }
}

async fn handle_socket(socket: WebSocket, room_id: RoomId, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let session = PeerSession::new(room_id.clone(), tx);
    let peer_id = session.peer_id().clone();

    // The room may have emptied out between the upgrade check and now.
    if let Err(e) = service.join(&session) {
        warn!("Dropping connection {} for room {}: {}", peer_id, room_id, e);
        let _ = sender.send(Message::Close(None)).await;
        return;
    }
    info!("New WebSocket connection: {} in room {}", peer_id, room_id);

    let mut send_task = tokio::spawn({
        let session = session.clone();

        async move {
            while let Some(msg) = rx.recv().await {
                if !session.is_open() {
                    continue;
                }
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
            session.mark(PeerState::Closed);
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let session = session.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        service.route(session.room_id(), session.peer_id(), text.as_str());
                    }
                    // Keep polling: the next read flushes the queued close reply,
                    // then the stream ends.
                    Message::Close(_) => session.mark(PeerState::Closing),
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            // A close handshake may still be waiting on the reader to flush its reply.
            if tokio::time::timeout(CLOSE_GRACE, &mut recv_task).await.is_err() {
                recv_task.abort();
            }
        }
        _ = (&mut recv_task) => send_task.abort(),
    };

    session.mark(PeerState::Closed);
    let notified = service.leave(&room_id, &peer_id);
    info!("WebSocket disconnected: {} ({} notified)", peer_id, notified);
}
