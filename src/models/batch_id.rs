//! # Batch Identifier
//!
//! Opaque fixed-format identifier used as the state store key and carried in
//! every outbound payload. Backed by a UUID so it has a stable 16-byte binary
//! form alongside its textual form.

use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the binary encoding produced by [`BatchId::to_bytes`]
pub const BATCH_ID_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Generate a fresh random batch id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Binary form used when a payload carries the id as raw bytes
    pub fn to_bytes(&self) -> [u8; BATCH_ID_LEN] {
        *self.0.as_bytes()
    }

    /// Parse the binary form; anything other than exactly 16 bytes is rejected
    pub fn from_bytes(bytes: &[u8]) -> TrackerResult<Self> {
        Uuid::from_slice(bytes).map(Self).map_err(|e| {
            TrackerError::InvalidBatchId(format!(
                "expected {BATCH_ID_LEN} bytes, got {}: {e}",
                bytes.len()
            ))
        })
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BatchId {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TrackerError::InvalidBatchId(format!("{s}: {e}")))
    }
}

impl From<Uuid> for BatchId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
