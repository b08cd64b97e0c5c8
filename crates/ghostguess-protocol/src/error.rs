//! Error types for the protocol layer.
//!
//! Each crate in Ghostguess defines its own error enum, so a
//! `ProtocolError` always means a serialization problem, never a rule or
//! timer problem.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (Rust value → bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (bytes → Rust value).
    ///
    /// Malformed JSON, an unknown `"type"` tag, or a missing field.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but makes no sense at the protocol level,
    /// e.g. an empty frame.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
