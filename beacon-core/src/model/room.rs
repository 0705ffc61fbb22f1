use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ROOM_ID_LEN: usize = 6;
const ROOM_ID_MIN: u32 = 100_000;
const ROOM_ID_MAX: u32 = 999_999;

/// Short, human-typable room code: always six ASCII digits.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("room id must be exactly six digits, got {0:?}")]
pub struct InvalidRoomId(pub String);

impl RoomId {
    /// Draws a fresh candidate code. Collisions are the caller's concern.
    pub fn generate() -> Self {
        let n = rand::rng().random_range(ROOM_ID_MIN..=ROOM_ID_MAX);
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomId {
    type Err = InvalidRoomId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ROOM_ID_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidRoomId(s.to_string()))
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the room admission response.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreated {
    pub room_id: RoomId,
}
