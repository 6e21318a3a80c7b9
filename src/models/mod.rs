//! # Models
//!
//! Identifiers and value types shared by the reducer, the codec, and the
//! boundary consumer.

pub mod batch_id;

pub use batch_id::BatchId;
