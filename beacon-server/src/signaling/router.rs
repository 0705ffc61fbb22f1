use crate::transport::PeerSession;
use beacon_core::{PeerId, SignalMessage};

/// Where a stamped message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Addressed: only the named peer, if it is present and open.
    Unicast(PeerId),
    /// Unaddressed: every open member except the sender.
    Broadcast,
}

impl Route {
    pub fn of(msg: &SignalMessage) -> Self {
        match &msg.to {
            Some(target) => Self::Unicast(target.clone()),
            None => Self::Broadcast,
        }
    }
}

/// Picks the recipients of a message from `sender` out of a member snapshot.
///
/// Pure: no I/O, no locking. Peers whose transport is not open are skipped.
pub fn recipients<'a>(
    sender: &PeerId,
    route: &Route,
    members: &'a [PeerSession],
) -> Vec<&'a PeerSession> {
    match route {
        Route::Unicast(target) => members
            .iter()
            .filter(|peer| peer.peer_id() == target && peer.is_open())
            .take(1)
            .collect(),
        Route::Broadcast => members
            .iter()
            .filter(|peer| peer.peer_id() != sender && peer.is_open())
            .collect(),
    }
}
