//! # Messaging Module
//!
//! Message shapes, payload encoding, and the in-process consume loop that
//! connects a record stream to the tracker.

pub mod codec;
pub mod consumer;
pub mod errors;
pub mod message;

pub use codec::{JsonCodec, MessageCodec};
pub use consumer::{
    ChannelPublisher, ConsumeOutcome, ConsumedRecord, MessagePublisher, PublishedMessage,
    TrackerConsumer,
};
pub use errors::{MessagingError, MessagingResult};
pub use message::{EventEnvelope, OutboundMessage, Topic, WorkItem};
