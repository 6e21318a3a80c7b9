//! End-to-end reducer scenarios over a single tracker instance

mod common;

use batch_tracker::{
    BatchId, BatchParameters, EventEnvelope, EventStatus, Granularity, Topic, TrackerError,
    TrackerEvent,
};
use common::*;

fn pending(job_count: u32, mean_duration_ms: u64, failure_rate: f64) -> TrackerEvent {
    TrackerEvent::pending(BatchParameters::new(job_count, mean_duration_ms, failure_rate))
}

#[test]
fn batch_b1_succeeds_after_every_job_succeeds() {
    let mut tracker = deterministic_tracker(vec![0, 57, 99]);
    let b1 = batch_b1();

    let outcome = tracker.update_state(0, b1, &pending(3, 100, 0.1)).unwrap();
    let messages = outcome.messages();
    assert_eq!(messages.len(), 4);

    for (index, message) in messages[..3].iter().enumerate() {
        assert_eq!(message.topic, Topic::Worker);
        assert_eq!(message.key, b1);
        let item = decode_work_item(message);
        assert_eq!(item.job_id, index as u32);
        assert_eq!(item.batch_id, b1);
        assert_eq!(item.failure_rate, 0.1);
        assert!((50..150).contains(&item.duration_ms));
    }
    assert_eq!(
        messages[..3]
            .iter()
            .map(|m| decode_work_item(m).duration_ms)
            .collect::<Vec<_>>(),
        vec![50, 107, 149]
    );

    assert_eq!(messages[3].topic, Topic::Tracker);
    assert_eq!(
        decode_envelope(&messages[3]),
        EventEnvelope::batch_status(b1, EventStatus::Running)
    );

    for job_id in 0..2 {
        let outcome = tracker
            .update_state(1 + job_id as i64, b1, &TrackerEvent::job(job_id, EventStatus::Success))
            .unwrap();
        assert!(outcome.messages().is_empty());
    }

    let outcome = tracker
        .update_state(3, b1, &TrackerEvent::job(2, EventStatus::Success))
        .unwrap();
    assert_eq!(outcome.messages().len(), 1);
    let terminal = decode_envelope(&outcome.messages()[0]);
    assert_eq!(terminal.granularity, Granularity::Batch);
    assert_eq!(terminal.status, EventStatus::Success);
    assert_eq!(terminal.batch_id, b1);
}

#[test]
fn batch_b1_fails_fast_and_ignores_later_jobs() {
    let mut tracker = deterministic_tracker(vec![0]);
    let b1 = batch_b1();

    tracker.update_state(0, b1, &pending(3, 100, 0.1)).unwrap();
    let outcome = tracker
        .update_state(1, b1, &TrackerEvent::job(0, EventStatus::Success))
        .unwrap();
    assert!(outcome.messages().is_empty());

    let outcome = tracker
        .update_state(2, b1, &TrackerEvent::job(1, EventStatus::Failure))
        .unwrap();
    assert_eq!(outcome.messages().len(), 1);
    assert_eq!(outcome.messages()[0].topic, Topic::Tracker);
    assert_eq!(
        decode_envelope(&outcome.messages()[0]),
        EventEnvelope::batch_status(b1, EventStatus::Failure)
    );

    let outcome = tracker
        .update_state(3, b1, &TrackerEvent::job(2, EventStatus::Success))
        .unwrap();
    assert!(outcome.messages().is_empty());
    assert!(!outcome.is_recovered());

    let batch = tracker.batch(&b1).unwrap();
    assert!(batch.is_failed());
    assert_eq!(batch.success_count(), 1);
    assert_eq!(batch.failure_count(), 1);
}

#[test]
fn zero_job_batch_is_never_tracked() {
    let mut tracker = deterministic_tracker(vec![0]);
    let batch_id = BatchId::new();

    let outcome = tracker.update_state(0, batch_id, &pending(0, 100, 0.5)).unwrap();
    assert!(outcome.messages().is_empty());
    assert!(!tracker.store().contains(&batch_id));

    let outcome = tracker
        .update_state(1, batch_id, &TrackerEvent::job(0, EventStatus::Success))
        .unwrap();
    assert!(outcome.messages().is_empty());
    assert!(matches!(
        outcome.recovered_error(),
        Some(TrackerError::UnseenBatch { batch_id: id }) if *id == batch_id
    ));
}

#[test]
fn job_event_for_unseen_batch_is_swallowed() {
    let mut tracker = deterministic_tracker(vec![0]);

    for status in [EventStatus::Success, EventStatus::Failure] {
        let outcome = tracker
            .update_state(0, BatchId::new(), &TrackerEvent::job(0, status))
            .unwrap();
        assert!(outcome.is_recovered());
        assert!(outcome.messages().is_empty());
    }
    assert!(tracker.store().is_empty());
}

#[test]
fn failure_after_partial_progress_emits_exactly_one_failure() {
    let mut tracker = deterministic_tracker(vec![0]);
    let batch_id = BatchId::new();
    tracker.update_state(0, batch_id, &pending(4, 10, 0.0)).unwrap();

    let events = [
        TrackerEvent::job(3, EventStatus::Failure),
        TrackerEvent::job(0, EventStatus::Failure),
        TrackerEvent::job(1, EventStatus::Success),
        TrackerEvent::job(2, EventStatus::Success),
        TrackerEvent::job(3, EventStatus::Failure),
    ];

    let emitted: Vec<usize> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            tracker
                .update_state(i as i64 + 1, batch_id, event)
                .unwrap()
                .messages()
                .len()
        })
        .collect();

    assert_eq!(emitted, vec![1, 0, 0, 0, 0]);
    assert_eq!(tracker.batch(&batch_id).unwrap().failure_count(), 1);
}

#[test]
fn batches_are_tracked_independently() {
    let mut tracker = deterministic_tracker(vec![0]);
    let first = BatchId::new();
    let second = BatchId::new();

    tracker.update_state(0, first, &pending(1, 10, 0.0)).unwrap();
    tracker.update_state(1, second, &pending(2, 10, 0.0)).unwrap();

    let outcome = tracker
        .update_state(2, second, &TrackerEvent::job(0, EventStatus::Failure))
        .unwrap();
    assert_eq!(decode_envelope(&outcome.messages()[0]).status, EventStatus::Failure);

    let outcome = tracker
        .update_state(3, first, &TrackerEvent::job(0, EventStatus::Success))
        .unwrap();
    assert_eq!(decode_envelope(&outcome.messages()[0]).status, EventStatus::Success);
    assert_eq!(tracker.store().len(), 2);
}

#[test]
fn rebuild_from_log_matches_live_state() {
    let b1 = batch_b1();
    let other = BatchId::new();
    let log = vec![
        (0, b1, pending(3, 100, 0.1)),
        (1, other, pending(2, 20, 0.0)),
        (2, b1, TrackerEvent::job(0, EventStatus::Success)),
        (3, other, TrackerEvent::job(1, EventStatus::Failure)),
        (4, BatchId::new(), TrackerEvent::job(0, EventStatus::Success)),
        (5, b1, TrackerEvent::job(1, EventStatus::Success)),
    ];

    let mut live = deterministic_tracker(vec![0]);
    for (offset, batch_id, event) in &log {
        live.update_state(*offset, *batch_id, event).unwrap();
    }

    let mut rebuilt = deterministic_tracker(vec![42]);
    assert_eq!(rebuilt.rebuild(log).unwrap(), 6);

    assert_eq!(rebuilt.store().len(), live.store().len());
    for (batch_id, batch) in live.store().iter() {
        assert_eq!(rebuilt.batch(batch_id), Some(batch));
    }
}
