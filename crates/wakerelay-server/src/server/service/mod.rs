//! Broker service and its HTTP surface.
//!
//! ## Structure
//!
//! - [`handler`] - `BrokerService`, the register/claim operations over the
//!   shared [`RequestStore`](wakerelay::RequestStore).
//! - [`routes`] - axum router mapping claim outcomes to HTTP statuses.

pub mod handler;
pub mod routes;
