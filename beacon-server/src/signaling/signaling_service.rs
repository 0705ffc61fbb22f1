use crate::error::RelayError;
use crate::room::RoomRegistry;
use crate::signaling::router::{Route, recipients};
use crate::transport::PeerSession;
use beacon_core::{IceServerConfig, PeerId, RoomId, SignalMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct SignalingInner {
    registry: RoomRegistry,
    ice_servers: Vec<IceServerConfig>,
}

/// Shared handle used by every HTTP and WebSocket handler.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                registry: RoomRegistry::new(),
                ice_servers,
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn allocate_room(&self) -> RoomId {
        self.inner.registry.allocate_room()
    }

    /// Gate checked before a WebSocket upgrade is accepted.
    pub fn ensure_room(&self, room_id: &RoomId) -> Result<(), RelayError> {
        if self.inner.registry.contains(room_id) {
            Ok(())
        } else {
            Err(RelayError::RoomNotFound(room_id.clone()))
        }
    }

    /// Attaches a freshly upgraded peer: `welcome` to it, `join` to everyone else.
    pub fn join(&self, session: &PeerSession) -> Result<(), RelayError> {
        let peer_id = session.peer_id().clone();

        // Queued before attaching so nothing routed to the new peer can overtake it.
        session.send(&SignalMessage::welcome(&peer_id)?)?;

        let existing = self
            .inner
            .registry
            .attach(session.room_id(), session.clone())?;

        let notified = self.deliver(&SignalMessage::join(peer_id.clone()), existing.iter());
        info!(
            "Peer {} joined room {} ({} notified)",
            peer_id,
            session.room_id(),
            notified
        );
        Ok(())
    }

    /// Routes one inbound text frame. Returns how many peers it was handed to.
    ///
    /// Malformed frames are dropped without telling anyone.
    pub fn route(&self, room_id: &RoomId, sender: &PeerId, text: &str) -> usize {
        let msg = match SignalMessage::parse_inbound(text) {
            Ok(msg) => msg.stamped(sender),
            Err(e) => {
                warn!("Dropping frame from {}: {}", sender, e);
                return 0;
            }
        };

        let route = Route::of(&msg);
        let members = self.inner.registry.members(room_id);
        let targets = recipients(sender, &route, &members);
        if targets.is_empty() {
            debug!("No recipient for {:?} from {} ({:?})", msg.kind, sender, route);
        }

        self.deliver(&msg, targets)
    }

    /// Detaches the peer and tells whoever is left. Safe to call more than once.
    pub fn leave(&self, room_id: &RoomId, peer_id: &PeerId) -> usize {
        let remaining = self.inner.registry.detach(room_id, peer_id);
        let open = remaining.iter().filter(|peer| peer.is_open());
        self.deliver(&SignalMessage::leave(peer_id.clone()), open)
    }

    fn deliver<'a>(
        &self,
        msg: &SignalMessage,
        targets: impl IntoIterator<Item = &'a PeerSession>,
    ) -> usize {
        let mut delivered = 0;
        for peer in targets {
            match peer.send(msg) {
                Ok(()) => delivered += 1,
                Err(e) => debug!("Skipping {:?} for {}: {}", msg.kind, peer.peer_id(), e),
            }
        }
        delivered
    }
}
