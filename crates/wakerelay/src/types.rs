//! Wire and outcome types for the broker protocol.

use serde::{Deserialize, Serialize};

/// Body of `POST /id`.
///
/// `mac` is carried as an opaque string; the worker validates it before
/// acting on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub id: String,
    pub mac: String,
}

/// A registration was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack;

/// Result of claiming the pending request for an id.
///
/// `NotFound` is the steady-state answer to a poll, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Claim {
    Found(String),
    NotFound,
}

impl Claim {
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl From<Option<String>> for Claim {
    fn from(payload: Option<String>) -> Self {
        payload.map_or(Self::NotFound, Self::Found)
    }
}

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub pending: usize,
}
