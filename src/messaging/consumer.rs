//! # Tracker Consumer
//!
//! In-process boundary between a record stream and the [`Tracker`]. Records
//! are decoded and applied strictly in log order, and the produced messages
//! are handed to a [`MessagePublisher`] before the record's offset counts as
//! committed.
//!
//! ## Failure Handling
//!
//! - Records that cannot be decoded are logged and skipped.
//! - Records at or below the committed offset are redeliveries and skipped.
//! - A fatal tracker error or a publish failure halts the consumer. The
//!   tracker may already have folded the failed record, so the only safe
//!   recovery is a fresh tracker replaying the log from the start.

use super::errors::{MessagingError, MessagingResult};
use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::logging::log_consume_error;
use crate::models::BatchId;
use crate::orchestration::{LogOffset, Tracker};
use crate::state_machine::TrackerEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One raw record read from the tracker topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    pub offset: LogOffset,
    pub payload: Vec<u8>,
}

impl ConsumedRecord {
    pub fn new(offset: LogOffset, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            payload: payload.into(),
        }
    }
}

/// An outbound message resolved to its broker-level topic name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: BatchId,
    pub payload: Vec<u8>,
}

#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, message: PublishedMessage) -> MessagingResult<()>;
}

/// Publisher backed by a bounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<PublishedMessage>,
}

impl ChannelPublisher {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PublishedMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MessagePublisher for ChannelPublisher {
    async fn publish(&self, message: PublishedMessage) -> MessagingResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| MessagingError::ChannelClosed)
    }
}

/// What happened to a single consumed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Applied; this many messages were published
    Published(usize),
    /// Job-level error swallowed by the tracker
    Recovered,
    /// Payload could not be decoded into an event
    Undecodable,
    /// Offset already committed; record ignored
    AlreadyCommitted,
}

pub struct TrackerConsumer<P: MessagePublisher> {
    tracker: Tracker,
    publisher: P,
    config: TrackerConfig,
    committed_offset: Option<LogOffset>,
    halted_at: Option<LogOffset>,
}

impl<P: MessagePublisher> TrackerConsumer<P> {
    pub fn new(tracker: Tracker, publisher: P, config: TrackerConfig) -> Self {
        Self {
            tracker,
            publisher,
            config,
            committed_offset: None,
            halted_at: None,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Highest offset whose step completed, including skipped records
    pub fn committed_offset(&self) -> Option<LogOffset> {
        self.committed_offset
    }

    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    pub async fn consume(&mut self, record: ConsumedRecord) -> TrackerResult<ConsumeOutcome> {
        if let Some(offset) = self.halted_at {
            return Err(TrackerError::ConsumerHalted { offset });
        }

        if self
            .committed_offset
            .is_some_and(|committed| record.offset <= committed)
        {
            debug!(offset = record.offset, "skipping already committed record");
            return Ok(ConsumeOutcome::AlreadyCommitted);
        }

        let (batch_id, event) = match self.tracker.codec().decode_event(&record.payload) {
            Ok(decoded) => decoded,
            Err(error) => {
                warn!(offset = record.offset, error = %error, "skipping undecodable record");
                self.committed_offset = Some(record.offset);
                return Ok(ConsumeOutcome::Undecodable);
            }
        };

        match self.apply(record.offset, batch_id, &event).await {
            Ok(outcome) => {
                self.committed_offset = Some(record.offset);
                Ok(outcome)
            }
            Err(error) => {
                log_consume_error(record.offset, &error.to_string(), Some(&batch_id.to_string()));
                self.halted_at = Some(record.offset);
                Err(error)
            }
        }
    }

    /// Consume records in order until the first fatal error.
    ///
    /// Returns the number of records that were applied and published.
    pub async fn consume_all<I>(&mut self, records: I) -> TrackerResult<usize>
    where
        I: IntoIterator<Item = ConsumedRecord>,
    {
        let mut applied = 0;
        for record in records {
            if let ConsumeOutcome::Published(_) = self.consume(record).await? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    async fn apply(
        &mut self,
        offset: LogOffset,
        batch_id: BatchId,
        event: &TrackerEvent,
    ) -> TrackerResult<ConsumeOutcome> {
        let outcome = self.tracker.update_state(offset, batch_id, event)?;
        if outcome.is_recovered() {
            return Ok(ConsumeOutcome::Recovered);
        }

        let messages = outcome.into_messages();
        let published = messages.len();
        for message in messages {
            let topic = self.config.topic_name(message.topic).to_string();
            self.publisher
                .publish(PublishedMessage {
                    topic,
                    key: message.key,
                    payload: message.payload,
                })
                .await?;
        }

        Ok(ConsumeOutcome::Published(published))
    }
}
