//! # Orchestration Core
//!
//! The reducer that drives batches through their lifecycle.
//!
//! ## Core Components
//!
//! - **Tracker**: dispatches each event by granularity and owns the store
//! - **StateStore**: batch aggregates keyed by batch id
//! - **JobFanout**: work items plus the RUNNING event for a pending batch
//! - **RandomSource**: injected jitter for work item durations
//! - **DownstreamDependencies**: hook for terminal batch transitions

pub mod dependencies;
pub mod jitter;
pub mod job_fanout;
pub mod state_store;
pub mod tracker;

pub use dependencies::{DownstreamDependencies, NoDownstreamDependencies};
pub use jitter::{jittered_duration, RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use job_fanout::JobFanout;
pub use state_store::StateStore;
pub use tracker::{LogOffset, StepOutcome, Tracker};
