use crate::error::RelayError;
use crate::room::Room;
use crate::transport::PeerSession;
use beacon_core::{PeerId, RoomId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{debug, info};

/// Room id → member set.
///
/// Every mutation runs under the DashMap entry lock of the room it touches, so
/// a member snapshot is never taken mid-mutation. Outside of the window between
/// allocation and the first attach, a room is present iff it has members.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty room under a fresh six-digit code.
    pub fn allocate_room(&self) -> RoomId {
        self.allocate_with(RoomId::generate)
    }

    fn allocate_with(&self, mut next_id: impl FnMut() -> RoomId) -> RoomId {
        loop {
            let candidate = next_id();
            match self.rooms.entry(candidate.clone()) {
                Entry::Occupied(entry) if !entry.get().is_empty() => {
                    debug!("Room id {} is taken, drawing again", candidate);
                    continue;
                }
                // Allocated but never joined: hand it out again.
                Entry::Occupied(_) => {}
                Entry::Vacant(entry) => {
                    entry.insert(Room::default());
                }
            }
            info!("Allocated room {}", candidate);
            return candidate;
        }
    }

    /// Adds `peer` to the room and returns the members that were already there.
    pub fn attach(
        &self,
        room_id: &RoomId,
        peer: PeerSession,
    ) -> Result<Vec<PeerSession>, RelayError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RelayError::RoomNotFound(room_id.clone()))?;

        let existing = room.snapshot();
        info!("Peer {} attached to room {}", peer.peer_id(), room_id);
        room.insert(peer);
        Ok(existing)
    }

    /// Removes the peer and returns the members left behind.
    ///
    /// The room is deleted once its last member is gone. Detaching a peer that
    /// is not in the room does nothing and returns no one.
    pub fn detach(&self, room_id: &RoomId, peer_id: &PeerId) -> Vec<PeerSession> {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return Vec::new();
        };

        if entry.get_mut().remove(peer_id).is_none() {
            return Vec::new();
        }
        info!("Peer {} detached from room {}", peer_id, room_id);

        if entry.get().is_empty() {
            entry.remove();
            info!("Room {} is empty, removed", room_id);
            return Vec::new();
        }

        entry.get().snapshot()
    }

    /// Current members of the room; empty when the room does not exist.
    pub fn members(&self, room_id: &RoomId) -> Vec<PeerSession> {
        self.rooms
            .get(room_id)
            .map(|room| room.snapshot())
            .unwrap_or_default()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn member_count(&self, room_id: &RoomId) -> Option<usize> {
        self.rooms.get(room_id).map(|room| room.len())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
