//! # Batch Aggregate
//!
//! In-memory progress of one batch. The transition function here is the single
//! place where batch completion policy is decided: all jobs must succeed, and
//! the first failure is terminal.

use super::states::EventStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAggregate {
    job_count: u32,
    success_count: u32,
    failure_count: u32,
}

impl BatchAggregate {
    pub fn new(job_count: u32) -> Self {
        Self {
            job_count,
            success_count: 0,
            failure_count: 0,
        }
    }

    pub fn job_count(&self) -> u32 {
        self.job_count
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Once any job has failed, no further outcome changes the batch status
    pub fn is_failed(&self) -> bool {
        self.failure_count > 0
    }

    /// Fold one job outcome into the counters and return the resulting batch
    /// status: `Running`, `Success` or `Failure`.
    ///
    /// Not idempotent. Each call increments a counter, so a duplicated SUCCESS
    /// delivered before any failure is counted twice.
    pub fn apply_job_status(&mut self, status: EventStatus) -> EventStatus {
        match status {
            EventStatus::Success => {
                self.success_count = self.success_count.saturating_add(1);
                if self.success_count == self.job_count {
                    return EventStatus::Success;
                }
            }
            EventStatus::Failure => {
                self.failure_count = self.failure_count.saturating_add(1);
                return EventStatus::Failure;
            }
            EventStatus::Pending | EventStatus::Running => {}
        }

        EventStatus::Running
    }
}
