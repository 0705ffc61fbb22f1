use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beacon_core::{InvalidRoomId, PeerId, RoomId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing roomId")]
    MissingRoomId,

    #[error("invalid roomId: {0}")]
    InvalidRoomId(#[from] InvalidRoomId),

    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("peer {0} is not accepting messages")]
    PeerUnavailable(PeerId),

    #[error("failed to serialize signal message: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingRoomId | Self::InvalidRoomId(_) | Self::RoomNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PeerUnavailable(_) | Self::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
