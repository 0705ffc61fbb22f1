use crate::model::peer::PeerId;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A STUN or TURN server handed to browsers for `RTCPeerConnection` setup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServersResponse {
    pub ice_servers: Vec<IceServerConfig>,
}

/// Closed set of message kinds carried over the signaling channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Welcome,
    Join,
    Leave,
    Offer,
    Answer,
    NewIceCandidate,
    ShareStopped,
}

impl SignalKind {
    /// Kinds a browser may send. `welcome`, `join` and `leave` are produced by the relay only.
    pub fn is_client_originated(self) -> bool {
        matches!(
            self,
            Self::Offer | Self::Answer | Self::NewIceCandidate | Self::ShareStopped
        )
    }
}

/// The JSON envelope exchanged over the signaling stream.
///
/// `payload` is kept as raw JSON so SDP descriptions and ICE candidates pass
/// through untouched. An explicit `null` is kept too; only an absent field is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMessage {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_peer_id"
    )]
    pub from: Option<PeerId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "target_peer_id"
    )]
    pub to: Option<PeerId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_payload"
    )]
    pub payload: Option<Box<RawValue>>,
}

#[derive(Debug, thiserror::Error)]
pub enum InboundError {
    #[error("malformed signal message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0:?} messages are issued by the relay only")]
    RelayOnly(SignalKind),
}

#[derive(Serialize)]
struct WelcomePayload<'a> {
    id: &'a PeerId,
}

impl SignalMessage {
    fn bare(kind: SignalKind, from: Option<PeerId>) -> Self {
        Self {
            kind,
            from,
            to: None,
            payload: None,
        }
    }

    /// Greeting for a freshly attached peer, carrying its assigned id.
    pub fn welcome(peer_id: &PeerId) -> Result<Self, serde_json::Error> {
        let payload = serde_json::value::to_raw_value(&WelcomePayload { id: peer_id })?;
        Ok(Self {
            payload: Some(payload),
            ..Self::bare(SignalKind::Welcome, None)
        })
    }

    pub fn join(peer_id: PeerId) -> Self {
        Self::bare(SignalKind::Join, Some(peer_id))
    }

    pub fn leave(peer_id: PeerId) -> Self {
        Self::bare(SignalKind::Leave, Some(peer_id))
    }

    /// Parses a frame received from a browser.
    pub fn parse_inbound(text: &str) -> Result<Self, InboundError> {
        let msg: Self = serde_json::from_str(text)?;
        if !msg.kind.is_client_originated() {
            return Err(InboundError::RelayOnly(msg.kind));
        }
        Ok(msg)
    }

    /// Overwrites whatever `from` the client claimed with the real sender.
    pub fn stamped(mut self, sender: &PeerId) -> Self {
        self.from = Some(sender.clone());
        self
    }
}

// `from` is never trusted, so garbage in it must not sink the whole frame.
fn lenient_peer_id<'de, D>(deserializer: D) -> Result<Option<PeerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

fn present_payload<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

fn target_peer_id<'de, D>(deserializer: D) -> Result<Option<PeerId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}
