//! Claim-once storage for pending wake requests.
//!
//! Ids and payloads live in a single map behind a single lock, so an id can
//! never be observed without its payload and a claim removes both at once.

use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory map of id to pending payload.
///
/// At most one payload is pending per id. A second [`put`](Self::put) for the
/// same id replaces the first (last write wins). [`take`](Self::take) is the
/// only way a payload leaves the store, and it hands each payload out exactly
/// once no matter how many callers race for it.
#[derive(Debug, Default)]
pub struct RequestStore {
    pending: Mutex<HashMap<String, String>>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the pending payload for `id`.
    ///
    /// Returns the payload that was replaced, if any.
    pub fn put(&self, id: impl Into<String>, payload: impl Into<String>) -> Option<String> {
        self.pending.lock().insert(id.into(), payload.into())
    }

    /// Removes and returns the pending payload for `id`.
    ///
    /// The presence check and the removal happen under one lock acquisition:
    /// of any number of concurrent callers for the same id, exactly one
    /// receives `Some`.
    pub fn take(&self, id: &str) -> Option<String> {
        self.pending.lock().remove(id)
    }

    /// Number of ids with a pending payload.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
