//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The gateway doesn't care how frames are encoded; it holds something that
//! implements [`Codec`]. [`JsonCodec`] is what the browser client speaks.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because a codec lives inside the gateway, which
/// is shared across connection tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type, and `ProtocolError::InvalidMessage` for an
    /// empty frame.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature (enabled by default).
///
/// ```rust
/// use ghostguess_protocol::{ClientCommand, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&ClientCommand::Guess { value: 7 }).unwrap();
/// let decoded: ClientCommand = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, ClientCommand::Guess { value: 7 });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty frame".into()));
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientCommand, PlayerId, ServerEvent};

    #[test]
    fn test_json_codec_encodes_internally_tagged_commands() {
        let bytes = JsonCodec.encode(&ClientCommand::Kick { target: PlayerId(4) }).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, r#"{"type":"Kick","target":4}"#);
    }

    #[test]
    fn test_json_codec_decodes_event() {
        let event: ServerEvent = JsonCodec.decode(br#"{"type":"Revived"}"#).unwrap();
        assert_eq!(event, ServerEvent::Revived);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let result: Result<ClientCommand, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_rejects_empty_frame() {
        let result: Result<ClientCommand, _> = JsonCodec.decode(b"");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }
}
