//! # Tracker
//!
//! Event-sourced reducer over the tracker topic. Each call to
//! [`Tracker::update_state`] folds one event into the [`StateStore`] and
//! returns the messages that the transition produces.
//!
//! ## Error Policy
//!
//! - **Job events**: handler errors (an unseen batch, a failed encode) are
//!   logged and swallowed. The step reports [`StepOutcome::Recovered`] so a
//!   single bad job event never stalls consumption of the log.
//! - **Batch events**: handler errors are wrapped in
//!   [`TrackerError::BatchUpdate`] and returned to the caller.
//!
//! A failed step never leaves partial effects: no messages are returned and
//! the store is untouched.
//!
//! ## Concurrency
//!
//! The tracker takes `&mut self` and processes one event to completion before
//! the next. Any partitioned deployment must route all events of a batch to
//! the same tracker, in log order.

use super::dependencies::{DownstreamDependencies, NoDownstreamDependencies};
use super::jitter::{RandomSource, SeededRandom, ThreadRandom};
use super::job_fanout::JobFanout;
use super::state_store::StateStore;
use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::messaging::{EventEnvelope, JsonCodec, MessageCodec, OutboundMessage, Topic};
use crate::models::BatchId;
use crate::state_machine::{
    BatchAggregate, BatchParameters, BatchTransition, EventStatus, TrackerEvent,
};
use tracing::{debug, info, warn};

/// Position of an event in the source log
pub type LogOffset = i64;

/// Result of a single successful dispatch step
#[derive(Debug)]
pub enum StepOutcome {
    /// Messages to publish, in order. May be empty.
    Emitted(Vec<OutboundMessage>),
    /// A job-level error was logged and swallowed; nothing to publish
    Recovered(TrackerError),
}

impl StepOutcome {
    pub fn messages(&self) -> &[OutboundMessage] {
        match self {
            Self::Emitted(messages) => messages,
            Self::Recovered(_) => &[],
        }
    }

    pub fn into_messages(self) -> Vec<OutboundMessage> {
        match self {
            Self::Emitted(messages) => messages,
            Self::Recovered(_) => Vec::new(),
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }

    pub fn recovered_error(&self) -> Option<&TrackerError> {
        match self {
            Self::Recovered(error) => Some(error),
            Self::Emitted(_) => None,
        }
    }
}

pub struct Tracker {
    store: StateStore,
    codec: Box<dyn MessageCodec>,
    random: Box<dyn RandomSource>,
    dependencies: Box<dyn DownstreamDependencies>,
}

impl Tracker {
    /// Create a tracker over an existing store with JSON payloads and
    /// thread-local randomness
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            codec: Box::new(JsonCodec),
            random: Box::new(ThreadRandom),
            dependencies: Box::new(NoDownstreamDependencies),
        }
    }

    /// Fresh tracker configured from `config`; a configured seed makes work
    /// item durations reproducible
    pub fn from_config(config: &TrackerConfig) -> Self {
        let tracker = Self::new(StateStore::new());
        match config.random_seed {
            Some(seed) => tracker.with_random_source(SeededRandom::new(seed)),
            None => tracker,
        }
    }

    pub fn with_codec(mut self, codec: impl MessageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn with_dependencies(mut self, dependencies: impl DownstreamDependencies + 'static) -> Self {
        self.dependencies = Box::new(dependencies);
        self
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn batch(&self, batch_id: &BatchId) -> Option<&BatchAggregate> {
        self.store.get(batch_id)
    }

    pub fn codec(&self) -> &dyn MessageCodec {
        self.codec.as_ref()
    }

    /// Fold one event from the log into the store.
    ///
    /// `offset` is only used as logging context.
    pub fn update_state(
        &mut self,
        offset: LogOffset,
        batch_id: BatchId,
        event: &TrackerEvent,
    ) -> TrackerResult<StepOutcome> {
        match event {
            TrackerEvent::Job { job_id, status } => {
                match self.update_job(offset, batch_id, *job_id, *status) {
                    Ok(message) => Ok(StepOutcome::Emitted(message.into_iter().collect())),
                    Err(error) => {
                        warn!(
                            offset,
                            batch_id = %batch_id,
                            job_id,
                            error = %error,
                            "failed updating job"
                        );
                        Ok(StepOutcome::Recovered(error))
                    }
                }
            }
            TrackerEvent::Batch(transition) => self
                .update_batch(offset, batch_id, transition)
                .map(StepOutcome::Emitted)
                .map_err(|error| TrackerError::batch_update(batch_id, error)),
        }
    }

    /// Rebuild state by folding an entire log, discarding produced messages.
    ///
    /// Returns the number of events applied. Stops at the first fatal error.
    pub fn rebuild<I>(&mut self, log: I) -> TrackerResult<usize>
    where
        I: IntoIterator<Item = (LogOffset, BatchId, TrackerEvent)>,
    {
        let mut applied = 0;
        for (offset, batch_id, event) in log {
            self.update_state(offset, batch_id, &event)?;
            applied += 1;
        }

        info!(applied, batches = self.store.len(), "rebuilt tracker state from log");
        Ok(applied)
    }

    fn update_batch(
        &mut self,
        offset: LogOffset,
        batch_id: BatchId,
        transition: &BatchTransition,
    ) -> TrackerResult<Vec<OutboundMessage>> {
        info!(offset, batch_id = %batch_id, status = %transition.status(), "batch event");

        match transition {
            BatchTransition::Pending(parameters) => self.run_batch(offset, batch_id, parameters),
            BatchTransition::Success => self.dependencies.on_batch_succeeded(batch_id),
            BatchTransition::Failure => self.dependencies.on_batch_failed(batch_id),
            BatchTransition::Running => Ok(Vec::new()),
        }
    }

    fn run_batch(
        &mut self,
        offset: LogOffset,
        batch_id: BatchId,
        parameters: &BatchParameters,
    ) -> TrackerResult<Vec<OutboundMessage>> {
        if parameters.job_count == 0 {
            info!(offset, batch_id = %batch_id, "batch has no jobs, no point running it");
            return Ok(Vec::new());
        }

        let messages =
            JobFanout::new(self.codec.as_ref(), self.random.as_mut()).generate(batch_id, parameters)?;

        let previous = self
            .store
            .insert(batch_id, BatchAggregate::new(parameters.job_count));
        if previous.is_some() {
            warn!(offset, batch_id = %batch_id, "batch submitted again, progress reset");
        }

        debug!(
            offset,
            batch_id = %batch_id,
            job_count = parameters.job_count,
            messages = messages.len(),
            "batch fanned out"
        );
        Ok(messages)
    }

    fn update_job(
        &mut self,
        offset: LogOffset,
        batch_id: BatchId,
        job_id: u32,
        status: EventStatus,
    ) -> TrackerResult<Option<OutboundMessage>> {
        if self.store.is_failed(&batch_id) {
            info!(
                offset,
                batch_id = %batch_id,
                job_id,
                status = %status,
                "ignoring, batch has already failed"
            );
            return Ok(None);
        }

        debug!(offset, batch_id = %batch_id, job_id, status = %status, "job event");

        let mut batch = *self
            .store
            .get(&batch_id)
            .ok_or(TrackerError::UnseenBatch { batch_id })?;

        let batch_status = batch.apply_job_status(status);
        if batch_status == EventStatus::Running {
            self.store.insert(batch_id, batch);
            return Ok(None);
        }

        let envelope = EventEnvelope::batch_status(batch_id, batch_status);
        let payload = self.codec.encode_event(&envelope)?;
        self.store.insert(batch_id, batch);

        info!(offset, batch_id = %batch_id, status = %batch_status, "batch terminated");
        Ok(Some(OutboundMessage::new(Topic::Tracker, batch_id, payload)))
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(StateStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{MessagingError, MessagingResult, WorkItem};
    use crate::orchestration::jitter::SequenceRandom;

    /// Codec that refuses to encode work items
    struct BrokenWorkCodec;

    impl MessageCodec for BrokenWorkCodec {
        fn encode_work_item(&self, _item: &WorkItem) -> MessagingResult<Vec<u8>> {
            Err(MessagingError::message_serialization("work encoding disabled"))
        }

        fn encode_event(&self, envelope: &EventEnvelope) -> MessagingResult<Vec<u8>> {
            JsonCodec.encode_event(envelope)
        }

        fn decode_event(&self, payload: &[u8]) -> MessagingResult<(BatchId, TrackerEvent)> {
            JsonCodec.decode_event(payload)
        }
    }

    /// Codec that refuses to encode any event
    struct BrokenEventCodec;

    impl MessageCodec for BrokenEventCodec {
        fn encode_work_item(&self, item: &WorkItem) -> MessagingResult<Vec<u8>> {
            JsonCodec.encode_work_item(item)
        }

        fn encode_event(&self, _envelope: &EventEnvelope) -> MessagingResult<Vec<u8>> {
            Err(MessagingError::message_serialization("event encoding disabled"))
        }

        fn decode_event(&self, payload: &[u8]) -> MessagingResult<(BatchId, TrackerEvent)> {
            JsonCodec.decode_event(payload)
        }
    }

    fn tracker() -> Tracker {
        Tracker::default().with_random_source(SequenceRandom::new(vec![0]))
    }

    #[test]
    fn test_unrecognized_batch_status_is_ignored() {
        let mut tracker = tracker();
        let batch_id = BatchId::new();

        let outcome = tracker
            .update_state(0, batch_id, &TrackerEvent::Batch(BatchTransition::Running))
            .unwrap();

        assert!(outcome.messages().is_empty());
        assert!(!outcome.is_recovered());
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_terminal_batch_events_are_no_ops() {
        let mut tracker = tracker();
        let batch_id = BatchId::new();

        for transition in [BatchTransition::Success, BatchTransition::Failure] {
            let outcome = tracker
                .update_state(0, batch_id, &TrackerEvent::Batch(transition))
                .unwrap();
            assert!(outcome.messages().is_empty());
        }
    }

    #[test]
    fn test_fan_out_encoding_failure_is_fatal_and_side_effect_free() {
        let mut tracker = tracker().with_codec(BrokenWorkCodec);
        let batch_id = BatchId::new();

        let err = tracker
            .update_state(3, batch_id, &TrackerEvent::pending(BatchParameters::new(2, 10, 0.0)))
            .unwrap_err();

        assert!(matches!(err, TrackerError::BatchUpdate { .. }));
        assert!(err.to_string().contains("work encoding disabled"));
        assert!(!tracker.store().contains(&batch_id));
    }

    #[test]
    fn test_running_event_encoding_failure_is_fatal() {
        let mut tracker = tracker().with_codec(BrokenEventCodec);
        let batch_id = BatchId::new();

        let result = tracker.update_state(
            0,
            batch_id,
            &TrackerEvent::pending(BatchParameters::new(1, 10, 0.0)),
        );

        assert!(result.is_err());
        assert!(tracker.batch(&batch_id).is_none());
    }

    #[test]
    fn test_job_encoding_failure_is_recovered_without_mutation() {
        let mut tracker = tracker();
        let batch_id = BatchId::new();
        tracker
            .update_state(0, batch_id, &TrackerEvent::pending(BatchParameters::new(1, 10, 0.0)))
            .unwrap();

        let mut tracker = tracker.with_codec(BrokenEventCodec);
        let outcome = tracker
            .update_state(1, batch_id, &TrackerEvent::job(0, EventStatus::Success))
            .unwrap();

        assert!(outcome.is_recovered());
        assert!(matches!(
            outcome.recovered_error(),
            Some(TrackerError::Messaging(_))
        ));
        assert_eq!(tracker.batch(&batch_id).unwrap().success_count(), 0);
    }

    #[test]
    fn test_dependency_hook_receives_terminal_batches() {
        #[derive(Default)]
        struct Recording {
            succeeded: Vec<BatchId>,
            failed: Vec<BatchId>,
        }

        struct Hook(std::sync::Arc<std::sync::Mutex<Recording>>);

        impl DownstreamDependencies for Hook {
            fn on_batch_succeeded(&mut self, batch_id: BatchId) -> TrackerResult<Vec<OutboundMessage>> {
                self.0.lock().unwrap().succeeded.push(batch_id);
                Ok(Vec::new())
            }

            fn on_batch_failed(&mut self, batch_id: BatchId) -> TrackerResult<Vec<OutboundMessage>> {
                self.0.lock().unwrap().failed.push(batch_id);
                Ok(Vec::new())
            }
        }

        let recording = std::sync::Arc::new(std::sync::Mutex::new(Recording::default()));
        let mut tracker = tracker().with_dependencies(Hook(recording.clone()));
        let ok = BatchId::new();
        let bad = BatchId::new();

        tracker
            .update_state(0, ok, &TrackerEvent::Batch(BatchTransition::Success))
            .unwrap();
        tracker
            .update_state(1, bad, &TrackerEvent::Batch(BatchTransition::Failure))
            .unwrap();

        let recording = recording.lock().unwrap();
        assert_eq!(recording.succeeded, vec![ok]);
        assert_eq!(recording.failed, vec![bad]);
    }

    #[test]
    fn test_resubmitted_batch_resets_progress() {
        let mut tracker = tracker();
        let batch_id = BatchId::new();
        let pending = TrackerEvent::pending(BatchParameters::new(2, 10, 0.0));

        tracker.update_state(0, batch_id, &pending).unwrap();
        tracker
            .update_state(1, batch_id, &TrackerEvent::job(0, EventStatus::Success))
            .unwrap();
        let outcome = tracker.update_state(2, batch_id, &pending).unwrap();

        assert_eq!(outcome.messages().len(), 3);
        assert_eq!(tracker.batch(&batch_id).unwrap().success_count(), 0);
    }
}
