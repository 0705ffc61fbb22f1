use crate::error::RelayError;
use crate::transport::peer_state::{AtomicPeerState, PeerState};
use axum::extract::ws::Message;
use beacon_core::{PeerId, RoomId, SignalMessage};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One accepted connection inside a room.
///
/// Cloning is cheap: clones share the outbound channel and the state cell, so a
/// snapshot of room members taken by the router observes state changes made by
/// the socket tasks.
#[derive(Clone)]
pub struct PeerSession {
    peer_id: PeerId,
    room_id: RoomId,
    outbound: mpsc::UnboundedSender<Message>,
    state: Arc<AtomicPeerState>,
}

impl PeerSession {
    /// Mints a fresh peer id for a connection bound to `room_id`.
    pub fn new(room_id: RoomId, outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            peer_id: PeerId::new(),
            room_id,
            outbound,
            state: Arc::new(AtomicPeerState::new(PeerState::Open)),
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn state(&self) -> PeerState {
        if self.outbound.is_closed() {
            return PeerState::Closed;
        }
        self.state.load()
    }

    pub fn is_open(&self) -> bool {
        self.state() == PeerState::Open
    }

    pub fn mark(&self, state: PeerState) {
        self.state.advance(state);
    }

    /// Queues `msg` for the socket writer. Never blocks.
    pub fn send(&self, msg: &SignalMessage) -> Result<(), RelayError> {
        if !self.is_open() {
            return Err(RelayError::PeerUnavailable(self.peer_id.clone()));
        }
        let json = serde_json::to_string(msg)?;
        self.outbound
            .send(Message::Text(json.into()))
            .map_err(|_| RelayError::PeerUnavailable(self.peer_id.clone()))
    }
}

impl fmt::Debug for PeerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerSession")
            .field("peer_id", &self.peer_id)
            .field("room_id", &self.room_id)
            .field("state", &self.state())
            .finish()
    }
}
