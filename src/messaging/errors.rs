//! # Messaging Error Types
//!
//! Errors raised while encoding outbound payloads, decoding inbound records,
//! and handing messages to a publisher.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Message serialization error: {message}")]
    MessageSerialization { message: String },

    #[error("Message deserialization error: {message}")]
    MessageDeserialization { message: String },

    #[error("Invalid event envelope: {reason}")]
    InvalidEnvelope { reason: String },

    #[error("Publish failed on topic {topic}: {message}")]
    Publish { topic: String, message: String },

    #[error("Publisher channel closed")]
    ChannelClosed,
}

impl MessagingError {
    /// Create a message serialization error
    pub fn message_serialization(message: impl Into<String>) -> Self {
        Self::MessageSerialization {
            message: message.into(),
        }
    }

    /// Create a message deserialization error
    pub fn message_deserialization(message: impl Into<String>) -> Self {
        Self::MessageDeserialization {
            message: message.into(),
        }
    }

    /// Create an invalid envelope error
    pub fn invalid_envelope(reason: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            reason: reason.into(),
        }
    }

    /// Create a publish error
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Whether the record that produced this error can never be processed
    pub fn is_undecodable(&self) -> bool {
        matches!(
            self,
            Self::MessageDeserialization { .. } | Self::InvalidEnvelope { .. }
        )
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            MessagingError::message_deserialization(err.to_string())
        } else {
            MessagingError::message_serialization(err.to_string())
        }
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;
