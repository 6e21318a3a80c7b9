//! # Payload Codec
//!
//! The tracker only ever sees typed messages; the codec decides how they become
//! bytes on the wire. [`JsonCodec`] is the default.

use super::errors::{MessagingError, MessagingResult};
use super::message::{EventEnvelope, WorkItem};
use crate::models::BatchId;
use crate::state_machine::TrackerEvent;

/// Encodes outbound messages and decodes inbound tracker records
pub trait MessageCodec: Send + Sync {
    fn encode_work_item(&self, item: &WorkItem) -> MessagingResult<Vec<u8>>;

    fn encode_event(&self, envelope: &EventEnvelope) -> MessagingResult<Vec<u8>>;

    fn decode_event(&self, payload: &[u8]) -> MessagingResult<(BatchId, TrackerEvent)>;
}

/// JSON payloads via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl MessageCodec for JsonCodec {
    fn encode_work_item(&self, item: &WorkItem) -> MessagingResult<Vec<u8>> {
        serde_json::to_vec(item).map_err(|e| {
            MessagingError::message_serialization(format!("could not marshal work message: {e}"))
        })
    }

    fn encode_event(&self, envelope: &EventEnvelope) -> MessagingResult<Vec<u8>> {
        serde_json::to_vec(envelope).map_err(|e| {
            MessagingError::message_serialization(format!("could not marshal event message: {e}"))
        })
    }

    fn decode_event(&self, payload: &[u8]) -> MessagingResult<(BatchId, TrackerEvent)> {
        let envelope: EventEnvelope = serde_json::from_slice(payload)?;
        envelope.into_event()
    }
}

impl JsonCodec {
    /// Decode a work item payload, as a worker would
    pub fn decode_work_item(&self, payload: &[u8]) -> MessagingResult<WorkItem> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Decode an outbound event payload back into its envelope
    pub fn decode_envelope(&self, payload: &[u8]) -> MessagingResult<EventEnvelope> {
        Ok(serde_json::from_slice(payload)?)
    }
}
