//! # State Store
//!
//! Batch aggregates keyed by batch id. Owned by a single tracker and mutated
//! only from its thread of execution, so no locking is involved. Entries are
//! never removed; retention is left to whoever owns the source log.

use crate::models::BatchId;
use crate::state_machine::BatchAggregate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    batches: HashMap<BatchId, BatchAggregate>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, batch_id: &BatchId) -> Option<&BatchAggregate> {
        self.batches.get(batch_id)
    }

    /// Insert or replace, returning the previous aggregate if there was one
    pub fn insert(&mut self, batch_id: BatchId, batch: BatchAggregate) -> Option<BatchAggregate> {
        self.batches.insert(batch_id, batch)
    }

    /// Failed-check that treats an unknown batch as not failed
    pub fn is_failed(&self, batch_id: &BatchId) -> bool {
        self.batches
            .get(batch_id)
            .is_some_and(BatchAggregate::is_failed)
    }

    pub fn contains(&self, batch_id: &BatchId) -> bool {
        self.batches.contains_key(batch_id)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BatchId, &BatchAggregate)> {
        self.batches.iter()
    }
}
