use crate::signaling::SignalingService;
use axum::Json;
use axum::extract::State;
use beacon_core::{IceServersResponse, RoomCreated};

/// `POST /room`: allocates a room code. Nobody is attached yet.
pub async fn create_room(State(service): State<SignalingService>) -> Json<RoomCreated> {
    Json(RoomCreated {
        room_id: service.allocate_room(),
    })
}

/// `GET /ice-servers`: the configured STUN/TURN servers.
pub async fn ice_servers(State(service): State<SignalingService>) -> Json<IceServersResponse> {
    Json(IceServersResponse {
        ice_servers: service.get_ice_servers(),
    })
}
