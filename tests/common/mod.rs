//! Shared helpers for tracker integration tests

#![allow(dead_code)]

use batch_tracker::{
    BatchId, EventEnvelope, JsonCodec, OutboundMessage, SequenceRandom, StateStore, Tracker,
    WorkItem,
};

/// Fixed id standing in for batch "B1"
pub fn batch_b1() -> BatchId {
    "00000000-0000-4000-8000-0000000000b1"
        .parse()
        .expect("valid batch id")
}

/// Tracker with a fresh store and a deterministic jitter sequence
pub fn deterministic_tracker(jitter: Vec<u64>) -> Tracker {
    Tracker::new(StateStore::new()).with_random_source(SequenceRandom::new(jitter))
}

pub fn decode_work_item(message: &OutboundMessage) -> WorkItem {
    JsonCodec
        .decode_work_item(&message.payload)
        .expect("work item payload")
}

pub fn decode_envelope(message: &OutboundMessage) -> EventEnvelope {
    JsonCodec
        .decode_envelope(&message.payload)
        .expect("event payload")
}
