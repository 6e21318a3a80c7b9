//! # Message Structures
//!
//! Wire-level shapes of the two message kinds the tracker deals in: work items
//! published to the worker topic, and event envelopes flowing through the
//! tracker topic in both directions.

use super::errors::{MessagingError, MessagingResult};
use crate::models::BatchId;
use crate::state_machine::{BatchParameters, BatchTransition, EventStatus, Granularity, TrackerEvent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of work for an external worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub batch_id: BatchId,
    /// 0-based, unique within the batch
    pub job_id: u32,
    /// Simulated execution time in milliseconds
    pub duration_ms: u64,
    /// Failure probability copied from the batch parameters
    pub failure_rate: f64,
}

/// Wire form of a tracker event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub batch_id: BatchId,
    pub granularity: Granularity,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BatchParameters>,
}

impl EventEnvelope {
    /// Envelope for a batch-level status change without parameters
    pub fn batch_status(batch_id: BatchId, status: EventStatus) -> Self {
        Self {
            batch_id,
            granularity: Granularity::Batch,
            status,
            job_id: None,
            parameters: None,
        }
    }

    pub fn from_event(batch_id: BatchId, event: &TrackerEvent) -> Self {
        match event {
            TrackerEvent::Job { job_id, status } => Self {
                batch_id,
                granularity: Granularity::Job,
                status: *status,
                job_id: Some(*job_id),
                parameters: None,
            },
            TrackerEvent::Batch(transition) => Self {
                batch_id,
                granularity: Granularity::Batch,
                status: transition.status(),
                job_id: None,
                parameters: match transition {
                    BatchTransition::Pending(parameters) => Some(*parameters),
                    _ => None,
                },
            },
        }
    }

    /// Split into the state store key and the typed event.
    ///
    /// A job envelope must carry a job id. A pending batch envelope without
    /// parameters becomes a zero-job batch.
    pub fn into_event(self) -> MessagingResult<(BatchId, TrackerEvent)> {
        let event = match self.granularity {
            Granularity::Job => {
                let job_id = self.job_id.ok_or_else(|| {
                    MessagingError::invalid_envelope(format!(
                        "job event for batch {} has no job_id",
                        self.batch_id
                    ))
                })?;
                TrackerEvent::Job {
                    job_id,
                    status: self.status,
                }
            }
            Granularity::Batch => TrackerEvent::Batch(match self.status {
                EventStatus::Pending => {
                    BatchTransition::Pending(self.parameters.unwrap_or_default())
                }
                EventStatus::Running => BatchTransition::Running,
                EventStatus::Success => BatchTransition::Success,
                EventStatus::Failure => BatchTransition::Failure,
            }),
        };

        Ok((self.batch_id, event))
    }
}

/// Logical destination of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Work items for the worker pool
    Worker,
    /// Batch and job status events, consumed by the tracker itself
    Tracker,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker => write!(f, "worker"),
            Self::Tracker => write!(f, "tracker"),
        }
    }
}

/// Encoded message ready for the boundary to publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: Topic,
    /// Partitioning key; all messages for a batch share it
    pub key: BatchId,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    pub fn new(topic: Topic, key: BatchId, payload: Vec<u8>) -> Self {
        Self {
            topic,
            key,
            payload,
        }
    }
}
