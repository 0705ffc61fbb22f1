mod peer_session;
mod peer_state;

pub use peer_session::*;
pub use peer_state::PeerState;
