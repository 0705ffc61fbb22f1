use crate::transport::PeerSession;
use beacon_core::PeerId;
use std::collections::HashMap;

/// Member set of one room. Owned by the [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Default)]
pub struct Room {
    members: HashMap<PeerId, PeerSession>,
}

impl Room {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, peer: PeerSession) {
        self.members.insert(peer.peer_id().clone(), peer);
    }

    pub(crate) fn remove(&mut self, peer_id: &PeerId) -> Option<PeerSession> {
        self.members.remove(peer_id)
    }

    pub(crate) fn snapshot(&self) -> Vec<PeerSession> {
        self.members.values().cloned().collect()
    }
}
