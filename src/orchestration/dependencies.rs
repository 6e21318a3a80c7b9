//! # Downstream Dependencies
//!
//! Hook invoked when a batch reaches a terminal status on the tracker topic.
//! Cross-batch dependency resolution is not implemented: the default hook
//! does nothing, but the SUCCESS and FAILURE branches of the batch handler
//! always route through here.

use crate::error::TrackerResult;
use crate::messaging::OutboundMessage;
use crate::models::BatchId;

pub trait DownstreamDependencies: Send {
    /// Start batches that were waiting on `batch_id`
    fn on_batch_succeeded(&mut self, batch_id: BatchId) -> TrackerResult<Vec<OutboundMessage>> {
        let _ = batch_id;
        Ok(Vec::new())
    }

    /// Cancel batches that were waiting on `batch_id`
    fn on_batch_failed(&mut self, batch_id: BatchId) -> TrackerResult<Vec<OutboundMessage>> {
        let _ = batch_id;
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDownstreamDependencies;

impl DownstreamDependencies for NoDownstreamDependencies {}
