//! # Job Fan-out
//!
//! Turns a pending batch into its work: one work item per job on the worker
//! topic, followed by a single BATCH/RUNNING event on the tracker topic.
//!
//! The output is all-or-nothing. Every message is encoded before any is
//! returned, so an encoding failure never leaves a partial fan-out behind.
//! Consumers may rely on the ordering: once RUNNING is observed, every work
//! item of the batch has already been published.

use super::jitter::{jittered_duration, RandomSource};
use crate::messaging::{EventEnvelope, MessageCodec, MessagingResult, OutboundMessage, Topic, WorkItem};
use crate::models::BatchId;
use crate::state_machine::{BatchParameters, EventStatus};

pub struct JobFanout<'a> {
    codec: &'a dyn MessageCodec,
    random: &'a mut dyn RandomSource,
}

impl<'a> JobFanout<'a> {
    pub fn new(codec: &'a dyn MessageCodec, random: &'a mut dyn RandomSource) -> Self {
        Self { codec, random }
    }

    /// Work items for every job of the batch, in job-index order
    pub fn work_items(&mut self, batch_id: BatchId, parameters: &BatchParameters) -> Vec<WorkItem> {
        (0..parameters.job_count)
            .map(|job_id| WorkItem {
                batch_id,
                job_id,
                duration_ms: jittered_duration(parameters.mean_duration_ms, &mut *self.random),
                failure_rate: parameters.failure_rate,
            })
            .collect()
    }

    /// Encode the complete fan-out: `job_count` work items then one RUNNING event
    pub fn generate(
        &mut self,
        batch_id: BatchId,
        parameters: &BatchParameters,
    ) -> MessagingResult<Vec<OutboundMessage>> {
        let mut messages = Vec::with_capacity(parameters.job_count as usize + 1);

        for item in self.work_items(batch_id, parameters) {
            let payload = self.codec.encode_work_item(&item)?;
            messages.push(OutboundMessage::new(Topic::Worker, batch_id, payload));
        }

        let running = EventEnvelope::batch_status(batch_id, EventStatus::Running);
        let payload = self.codec.encode_event(&running)?;
        messages.push(OutboundMessage::new(Topic::Tracker, batch_id, payload));

        Ok(messages)
    }
}
