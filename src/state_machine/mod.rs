// State machine module for batch lifecycle tracking
//
// Batch state is never stored directly: it is the fold of job outcome events
// over a BatchAggregate, driven by the tracker in log order.

pub mod batch;
pub mod events;
pub mod states;

// Re-export main types for convenient access
pub use batch::BatchAggregate;
pub use events::{BatchParameters, BatchTransition, TrackerEvent};
pub use states::{EventStatus, Granularity};
