//! Error types shared by the broker and the worker.
//!
//! ## Error Cases
//! - `InvalidMac`: A payload or identity did not look like a hardware address.
//! - `Transport`: The broker could not be reached or its response could not be
//!   read.
//! - `UnexpectedStatus`: The broker answered with a status outside the claim
//!   protocol.
//! - `Identity`: The worker could not determine its own hardware address.
//! - `Wake`: The wake action ran but did not succeed.

use crate::mac::InvalidMac;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the wake relay.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// A candidate address failed validation.
    #[error("Invalid MAC address: {0}")]
    InvalidMac(#[from] InvalidMac),

    /// Network failure, timeout or unreadable response body.
    #[error("Transport error: {context}")]
    Transport { context: String },

    /// The broker replied with a status the claim protocol does not define.
    #[error("Unexpected broker status: {status}")]
    UnexpectedStatus { status: u16 },

    /// The machine's own hardware address could not be resolved.
    #[error("Identity resolution failed: {reason}")]
    Identity { reason: String },

    /// The wake action failed to run or exited unsuccessfully.
    #[error("Wake action failed: {context}")]
    Wake { context: String },
}

impl Error {
    /// Whether the error came from talking to the broker, and so should drive
    /// the poll backoff.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::UnexpectedStatus { .. })
    }
}
