mod peer;
mod room;
mod signaling;

pub use peer::PeerId;
pub use room::{InvalidRoomId, RoomCreated, RoomId};
pub use signaling::{IceServerConfig, IceServersResponse, InboundError, SignalKind, SignalMessage};
