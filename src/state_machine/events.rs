use super::states::{EventStatus, Granularity};
use serde::{Deserialize, Serialize};

/// Parameters carried by the initial BATCH/PENDING event
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParameters {
    /// Number of jobs to spawn
    pub job_count: u32,
    /// Scheduling hint for spawned work, in milliseconds
    pub mean_duration_ms: u64,
    /// Failure probability injected into spawned work
    pub failure_rate: f64,
}

impl BatchParameters {
    pub fn new(job_count: u32, mean_duration_ms: u64, failure_rate: f64) -> Self {
        Self {
            job_count,
            mean_duration_ms,
            failure_rate,
        }
    }
}

/// Batch-level transitions reported on the tracker topic
#[derive(Debug, Clone, PartialEq)]
pub enum BatchTransition {
    /// Batch requested; the only transition that creates tracked state
    Pending(BatchParameters),
    /// Batch fanned out (emitted by the tracker itself)
    Running,
    Success,
    Failure,
}

impl BatchTransition {
    pub fn status(&self) -> EventStatus {
        match self {
            Self::Pending(_) => EventStatus::Pending,
            Self::Running => EventStatus::Running,
            Self::Success => EventStatus::Success,
            Self::Failure => EventStatus::Failure,
        }
    }
}

/// A decoded event from the tracker topic
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// Outcome reported by a worker for one job of a batch
    Job { job_id: u32, status: EventStatus },
    /// Status change of the batch as a whole
    Batch(BatchTransition),
}

impl TrackerEvent {
    pub fn job(job_id: u32, status: EventStatus) -> Self {
        Self::Job { job_id, status }
    }

    pub fn pending(parameters: BatchParameters) -> Self {
        Self::Batch(BatchTransition::Pending(parameters))
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Job { .. } => Granularity::Job,
            Self::Batch(_) => Granularity::Batch,
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            Self::Job { status, .. } => *status,
            Self::Batch(transition) => transition.status(),
        }
    }

    /// Job id for job events, `None` for batch events
    pub fn job_id(&self) -> Option<u32> {
        match self {
            Self::Job { job_id, .. } => Some(*job_id),
            Self::Batch(_) => None,
        }
    }
}
