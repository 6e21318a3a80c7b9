//! # Tracker Error Types
//!
//! Errors surfaced by the reducer and its boundary. Job-level errors are
//! swallowed by the dispatcher and reported as a recovered outcome; batch-level
//! errors are wrapped in [`TrackerError::BatchUpdate`] and propagated.

use crate::messaging::MessagingError;
use crate::models::BatchId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("previously unseen batch: {batch_id}")]
    UnseenBatch { batch_id: BatchId },

    #[error("failed updating batch {batch_id}: {source}")]
    BatchUpdate {
        batch_id: BatchId,
        #[source]
        source: Box<TrackerError>,
    },

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Invalid batch id: {0}")]
    InvalidBatchId(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("consumer halted after failed step at offset {offset}; replay from the start of the log")]
    ConsumerHalted { offset: i64 },
}

impl TrackerError {
    /// Wrap a batch-level handler error so the caller can abort the consume step
    pub fn batch_update(batch_id: BatchId, source: TrackerError) -> Self {
        Self::BatchUpdate {
            batch_id,
            source: Box::new(source),
        }
    }
}

impl From<::config::ConfigError> for TrackerError {
    fn from(err: ::config::ConfigError) -> Self {
        TrackerError::Configuration(err.to_string())
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
