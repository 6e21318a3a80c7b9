#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Batch Tracker
//!
//! Event-sourced tracker for batches of jobs driven by an append-only log.
//!
//! ## Overview
//!
//! A batch is requested with a BATCH/PENDING event. The tracker fans it out into
//! one work item per job plus a BATCH/RUNNING event, then folds the job outcome
//! events reported by workers until the batch either succeeds (every job
//! succeeded) or fails (first job failure). All state is the projection of the
//! log: a fresh tracker replaying the same log arrives at the same store.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Event types and the batch aggregate
//! - [`orchestration`] - The tracker, its state store and the job fan-out
//! - [`messaging`] - Wire messages, payload codec and the consume loop
//! - [`models`] - Batch identifiers
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_tracker::{BatchId, BatchParameters, EventStatus, Tracker, TrackerEvent};
//!
//! # fn main() -> Result<(), batch_tracker::TrackerError> {
//! let mut tracker = Tracker::default();
//! let batch_id = BatchId::new();
//!
//! let outcome = tracker.update_state(0, batch_id, &TrackerEvent::pending(BatchParameters::new(2, 100, 0.0)))?;
//! assert_eq!(outcome.messages().len(), 3);
//!
//! tracker.update_state(1, batch_id, &TrackerEvent::job(0, EventStatus::Success))?;
//! let outcome = tracker.update_state(2, batch_id, &TrackerEvent::job(1, EventStatus::Success))?;
//! assert_eq!(outcome.messages().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod state_machine;

pub use config::{LogFormat, TrackerConfig};
pub use error::{TrackerError, TrackerResult};
pub use messaging::{
    ChannelPublisher, ConsumeOutcome, ConsumedRecord, EventEnvelope, JsonCodec, MessageCodec,
    MessagePublisher, MessagingError, OutboundMessage, PublishedMessage, Topic, TrackerConsumer,
    WorkItem,
};
pub use models::BatchId;
pub use orchestration::{
    DownstreamDependencies, LogOffset, RandomSource, SeededRandom, SequenceRandom, StateStore,
    StepOutcome, ThreadRandom, Tracker,
};
pub use state_machine::{
    BatchAggregate, BatchParameters, BatchTransition, EventStatus, Granularity, TrackerEvent,
};
