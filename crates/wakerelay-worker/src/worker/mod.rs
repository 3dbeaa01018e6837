//! LAN-side half of the wake relay.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration.
//! - [`identity`] - The id this worker polls for.
//! - [`client`] - `Broker` trait and its HTTP implementation.
//! - [`wake`] - `WakeAction` trait, external command and magic packet.
//! - [`poll`] - The poll/backoff/validate/wake loop.
//! - [`telemetry`] - Log subscriber setup.

pub mod client;
pub mod config;
pub mod identity;
pub mod poll;
pub mod telemetry;
pub mod wake;
