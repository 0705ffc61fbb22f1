use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a peer's WebSocket as seen by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PeerState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl PeerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Shared cell the socket tasks update and routers read.
#[derive(Debug)]
pub(crate) struct AtomicPeerState(AtomicU8);

impl AtomicPeerState {
    pub(crate) fn new(state: PeerState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> PeerState {
        PeerState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// States only move forward: a closed peer never reopens.
    pub(crate) fn advance(&self, next: PeerState) {
        self.0.fetch_max(next as u8, Ordering::AcqRel);
    }
}
